//! Palmdrift - Entry Point
//!
//! Headless scripted tour of one session: boot, a stroll down the
//! beach, a chat, a quiz battle, a realm hop. A real frontend drives
//! [`Game`] exactly the same way, feeding it input samples once per
//! frame and rendering off the bus.

use std::path::Path;

use anyhow::Result;

use palmdrift::audio::NullSink;
use palmdrift::data::{export_default_data, DataManager};
use palmdrift::entities::grid_position;
use palmdrift::{
    Game, GameConfig, GameEvent, GamePhase, HeadlessStage, InputSample, Topic, Vec3,
};

/// Simulated frame length for the tour.
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Palmdrift v{}", env!("CARGO_PKG_VERSION"));

    if std::env::args().any(|arg| arg == "--export-data") {
        let target = Path::new("assets/data");
        export_default_data(target).map_err(anyhow::Error::msg)?;
        log::info!("Default game data exported to {}", target.display());
        return Ok(());
    }

    let config = GameConfig::load(Path::new("palmdrift.ron"));
    let data = DataManager::new();
    // The tour cheats off the loaded data; a player would read the
    // options on screen instead.
    let almanac = data.clone();

    let mut game = Game::new(
        Box::new(HeadlessStage::new()),
        Box::new(NullSink),
        config,
        data,
        None,
    );

    // A frontend would subscribe its widgets here. The tour just
    // narrates a couple of channels.
    game.bus().subscribe(Topic::QuizAnswerResult, |event| {
        if let GameEvent::QuizAnswerResult {
            correct,
            explanation,
            ..
        } = event
        {
            let verdict = if *correct { "right" } else { "wrong" };
            log::info!("answer was {}: {}", verdict, explanation);
        }
        Ok(())
    });
    game.bus().subscribe(Topic::RealmChange, |event| {
        if let GameEvent::RealmChanged { realm, name } = event {
            log::info!("now entering realm {}: {}", realm, name);
        }
        Ok(())
    });

    // Boot. The tasks would normally resolve as assets stream in.
    game.register_load_task("scene");
    game.register_load_task("radio");
    game.register_load_task("fonts");
    game.begin_loading();
    step(&mut game, 5);
    game.load_task_done("scene");
    game.load_task_done("radio");
    game.load_task_done("fonts");
    if game.phase() != GamePhase::Playing {
        anyhow::bail!("session failed to start: {:?}", game.phase());
    }

    game.radio_mut().toggle();
    if let Some(track) = game.radio().now_playing() {
        log::info!("radio on: {}", track.title);
    }

    // A short stroll with a lazy left drift.
    walk(&mut game, 120, 1.0, 0.3);
    let here = game.player().position;
    log::info!("wandered to ({:.1}, {:.1}, {:.1})", here.x, here.y, here.z);

    let Some(realm) = almanac.realm(game.config().starting_realm).cloned() else {
        anyhow::bail!("no starting realm defined");
    };

    if !realm.npcs.is_empty() {
        let spot = grid_position(realm.npc_origin, realm.spacing, 0);
        game.teleport_player(Vec3::new(spot.x, 0.0, spot.z + 1.0));
        step(&mut game, 10);
        game.tick(
            FRAME_DT,
            &InputSample {
                talk: true,
                ..Default::default()
            },
        );
        // Always take the first response; close terminal lines with talk.
        let mut turns = 0;
        while let Some(turn) = game.dialogue().map(|s| s.turn()) {
            log::info!("they say: {}", turn.line);
            if turn.responses.is_empty() {
                game.talk();
            } else {
                game.choose_response(0);
            }
            turns += 1;
            if turns > 8 {
                break;
            }
        }
    }

    if !realm.foes.is_empty() {
        let spot = grid_position(realm.foe_origin, realm.spacing, 0);
        game.teleport_player(Vec3::new(spot.x, 0.0, spot.z + 1.0));
        let mut waited = 0;
        while game.battle().is_none() && waited < 60 {
            step(&mut game, 1);
            waited += 1;
        }
        let mut rounds = 0;
        while let Some(posed) = game.battle().and_then(|b| b.current_question()) {
            let choice = correct_choice(&almanac, &posed.prompt).unwrap_or(0);
            log::info!(
                "question {}/{}: {}",
                posed.index + 1,
                posed.total,
                posed.prompt
            );
            game.answer_quiz(choice);
            // Ride out the answer-reveal delay.
            step(&mut game, 240);
            rounds += 1;
            if rounds > 8 {
                break;
            }
        }
    }

    // A souvenir and a pick-me-up.
    demo_items(&mut game);

    if almanac.realm_count() > 1 {
        game.change_realm(1);
        walk(&mut game, 60, 1.0, 0.0);
    }
    game.radio_mut().next_track();
    if let Some(track) = game.radio().now_playing() {
        log::info!("radio now: {}", track.title);
    }

    log::info!("Palmdrift tour over, shutting down cleanly");
    Ok(())
}

/// Tick `frames` frames of idle input.
fn step(game: &mut Game, frames: u32) {
    let input = InputSample::default();
    for _ in 0..frames {
        game.tick(FRAME_DT, &input);
    }
}

/// Tick `frames` frames of walking input.
fn walk(game: &mut Game, frames: u32, move_axis: f32, turn_axis: f32) {
    let input = InputSample {
        move_axis,
        turn_axis,
        ..Default::default()
    };
    for _ in 0..frames {
        game.tick(FRAME_DT, &input);
    }
}

/// Look an answer up across every loaded bank.
fn correct_choice(data: &DataManager, prompt: &str) -> Option<usize> {
    data.quizzes
        .banks
        .iter()
        .flat_map(|bank| bank.questions.iter())
        .find(|q| q.prompt == prompt)
        .map(|q| q.answer)
}

fn demo_items(game: &mut Game) {
    use palmdrift::items::{ItemDef, ItemKind};

    let shades = ItemDef::new(
        "chrome-shades",
        "Chrome Shades",
        "The sunset looks better through them.",
        ItemKind::Wearable,
    )
    .with_icon("icons/chrome-shades.png");
    let soda = ItemDef::new(
        "melon-soda",
        "Melon Soda",
        "Lukewarm. Still perfect.",
        ItemKind::Consumable { heal: 20 },
    )
    .with_icon("icons/melon-soda.png");
    if game.give_item(shades, 1).is_ok() {
        let _ = game.wear_item("chrome-shades");
    }
    if game.give_item(soda, 1).is_ok() && game.select_item(1).is_ok() {
        game.use_selected_item();
    }
    log::info!(
        "carrying {} stack(s), health {}/{}",
        game.inventory().slot_count(),
        game.health().current(),
        game.health().max()
    );
}
