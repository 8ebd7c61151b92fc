//! Audio system
//!
//! The radio is the only sound source in the game. Output goes through
//! the [`AudioSink`] trait; a backend that cannot play (browsers hold
//! audio hostage until a user gesture) degrades the radio to silence
//! without touching the rest of the session.

pub mod radio;

pub use radio::{default_playlist, RadioPlayer, Track};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    /// The backend exists but refuses to start yet.
    #[error("audio output locked until user gesture")]
    Locked,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Where sound actually goes.
pub trait AudioSink {
    fn play(&mut self, track: &Track) -> Result<(), AudioError>;
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Sink that swallows everything. Used headless and as the fallback when
/// no backend could be created.
#[derive(Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, track: &Track) -> Result<(), AudioError> {
        log::debug!("null sink: would play '{}'", track.title);
        Ok(())
    }

    fn stop(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}
