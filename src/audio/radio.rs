//! In-world radio
//!
//! A looping playlist the player can toggle and skip through. Playback
//! failures put the radio into a stopped state instead of erroring out of
//! the frame loop; the first refusal is logged, later ones are silent.

use serde::{Deserialize, Serialize};

use super::{AudioError, AudioSink};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Seconds. Drives auto-advance.
    pub duration: f32,
}

/// Playlist player over an [`AudioSink`].
pub struct RadioPlayer {
    sink: Box<dyn AudioSink>,
    playlist: Vec<Track>,
    current: usize,
    playing: bool,
    elapsed: f32,
    volume: f32,
    lock_reported: bool,
}

impl RadioPlayer {
    pub fn new(sink: Box<dyn AudioSink>, playlist: Vec<Track>) -> Self {
        Self {
            sink,
            playlist,
            current: 0,
            playing: false,
            elapsed: 0.0,
            volume: 0.8,
            lock_reported: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn now_playing(&self) -> Option<&Track> {
        if self.playing {
            self.playlist.get(self.current)
        } else {
            None
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.volume);
    }

    /// Toggle playback. Returns whether the radio ended up playing.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.sink.stop();
            self.playing = false;
        } else {
            self.try_play();
        }
        self.playing
    }

    /// Skip forward, wrapping at the end of the playlist.
    pub fn next_track(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.playlist.len();
        self.elapsed = 0.0;
        if self.playing {
            self.try_play();
        }
    }

    /// Skip backward, wrapping at the start.
    pub fn prev_track(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.current = (self.current + self.playlist.len() - 1) % self.playlist.len();
        self.elapsed = 0.0;
        if self.playing {
            self.try_play();
        }
    }

    /// Advance playback time; rolls onto the next track when the current
    /// one runs out.
    pub fn tick(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(track) = self.playlist.get(self.current) else {
            return;
        };
        self.elapsed += dt;
        if self.elapsed >= track.duration {
            self.next_track();
        }
    }

    fn try_play(&mut self) {
        let Some(track) = self.playlist.get(self.current) else {
            log::warn!("radio has an empty playlist");
            return;
        };
        match self.sink.play(track) {
            Ok(()) => {
                log::info!("radio: {} - {}", track.artist, track.title);
                self.playing = true;
                self.lock_reported = false;
            }
            Err(AudioError::Locked) => {
                if !self.lock_reported {
                    log::info!("radio waiting for audio unlock");
                    self.lock_reported = true;
                }
                self.playing = false;
            }
            Err(e) => {
                log::warn!("radio playback failed: {}", e);
                self.playing = false;
            }
        }
    }
}

/// The ship-with playlist.
pub fn default_playlist() -> Vec<Track> {
    fn track(id: &str, title: &str, artist: &str, duration: f32) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            duration,
        }
    }

    vec![
        track("palm-haze", "Palm Haze", "Mirror Coast", 212.0),
        track("dial-tone", "Dial Tone Sunset", "Plaza Ghost", 187.0),
        track("checkout", "Checkout Lane 7", "Mallsoft Deluxe", 243.0),
        track("rain-vhs", "Rain on VHS", "Mirror Coast", 198.0),
        track("arcade-heart", "Arcade Heart", "Neon Duet", 224.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingSink {
        played: Rc<RefCell<Vec<String>>>,
        locked: Rc<RefCell<bool>>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, track: &Track) -> Result<(), AudioError> {
            if *self.locked.borrow() {
                return Err(AudioError::Locked);
            }
            self.played.borrow_mut().push(track.id.clone());
            Ok(())
        }

        fn stop(&mut self) {}

        fn set_volume(&mut self, _volume: f32) {}
    }

    fn recording_radio() -> (RadioPlayer, Rc<RefCell<Vec<String>>>, Rc<RefCell<bool>>) {
        let played = Rc::new(RefCell::new(Vec::new()));
        let locked = Rc::new(RefCell::new(false));
        let sink = RecordingSink {
            played: played.clone(),
            locked: locked.clone(),
        };
        let radio = RadioPlayer::new(Box::new(sink), default_playlist());
        (radio, played, locked)
    }

    #[test]
    fn test_toggle_and_skip() {
        let (mut radio, played, _) = recording_radio();
        assert!(radio.toggle());
        assert_eq!(radio.now_playing().unwrap().id, "palm-haze");

        radio.next_track();
        assert_eq!(radio.now_playing().unwrap().id, "dial-tone");

        radio.prev_track();
        radio.prev_track();
        // Wrapped to the end of the playlist.
        assert_eq!(radio.now_playing().unwrap().id, "arcade-heart");
        assert_eq!(played.borrow().len(), 4);

        assert!(!radio.toggle());
        assert_eq!(radio.now_playing(), None);
    }

    #[test]
    fn test_locked_sink_keeps_radio_stopped() {
        let (mut radio, played, locked) = recording_radio();
        *locked.borrow_mut() = true;
        assert!(!radio.toggle());
        assert!(played.borrow().is_empty());

        // Unlock (user gesture) and try again.
        *locked.borrow_mut() = false;
        assert!(radio.toggle());
        assert_eq!(played.borrow().len(), 1);
    }

    #[test]
    fn test_track_runs_out_and_advances() {
        let (mut radio, _, _) = recording_radio();
        radio.toggle();
        let first_duration = radio.now_playing().unwrap().duration;
        radio.tick(first_duration + 0.1);
        assert_eq!(radio.now_playing().unwrap().id, "dial-tone");
    }

    #[test]
    fn test_volume_clamped() {
        let (mut radio, _, _) = recording_radio();
        radio.set_volume(3.0);
        assert_eq!(radio.volume(), 1.0);
        radio.set_volume(-1.0);
        assert_eq!(radio.volume(), 0.0);
    }
}
