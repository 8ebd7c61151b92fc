//! Game session
//!
//! [`Game`] owns every subsystem and runs the frame pipeline: loader
//! while booting, then player integration, proximity scan, and the timer
//! queue while playing. All cross-cutting narration goes out over the
//! bus, and always after the state it describes has been committed, so
//! no subscriber can observe the session mid-change.
//!
//! The renderer and the audio backend come in through traits; the
//! session never knows whether it is driving a real scene or a headless
//! test rig.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{default_playlist, AudioSink, RadioPlayer};
use crate::bus::{EventBus, GameEvent};
use crate::config::GameConfig;
use crate::data::DataManager;
use crate::dialogue::DialogueSession;
use crate::entities::{
    Awareness, EntityId, EntityKind, EntityRegistry, Foe, Identity, Npc, Position,
};
use crate::health::Health;
use crate::interact::{scan, InteractState, Transition};
use crate::items::{Inventory, InventoryError, ItemDef};
use crate::loader::LoaderQueue;
use crate::math::Vec3;
use crate::player::{InputSample, Player};
use crate::quiz::{BattleOutcome, BattleStep, QuizBattle};
use crate::stage::{Stage, Tint};

use super::tasks::{DelayQueue, DelayedAction};

/// Why the session is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseSource {
    /// The player opened the menu.
    Menu,
    /// The host lost focus (tab blur and the like).
    FocusLost,
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Boot tasks still resolving; the world does not exist yet.
    Loading,
    Playing,
    Paused(PauseSource),
    /// Health hit zero. Terminal; a fresh session is the only way back.
    GameOver,
}

/// One running game. Owns the world, narrates over its bus.
pub struct Game {
    phase: GamePhase,
    /// Coordination spine. The UI subscribes here; subsystems publish
    /// through the session, never directly at each other.
    bus: EventBus,
    /// Realm residents and the id index over them.
    registry: EntityRegistry,
    /// Renderer seam. Mints and updates avatars.
    stage: Box<dyn Stage>,
    player: Player,
    inventory: Inventory,
    health: Health,
    /// In-world radio. Self-contained; no bus traffic.
    radio: RadioPlayer,
    /// Boot tasks driving the Loading phase.
    loader: LoaderQueue,
    /// Owner-tagged timers on the session clock.
    tasks: DelayQueue,
    /// The quiz battle in progress, if a foe has one open.
    battle: Option<QuizBattle>,
    /// The conversation in progress, if an NPC has one open.
    dialogue: Option<DialogueSession>,
    config: GameConfig,
    /// Quiz banks, dialogue scripts, realm definitions.
    data: DataManager,
    /// Seeded for reproducible sessions.
    rng: StdRng,
}

impl Game {
    /// Build a session around a renderer and an audio backend. The world
    /// stays empty until the loader finishes and the starting realm is
    /// built.
    pub fn new(
        stage: Box<dyn Stage>,
        sink: Box<dyn AudioSink>,
        config: GameConfig,
        data: DataManager,
        seed: Option<u64>,
    ) -> Self {
        let config = config.sanitized();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let loader = LoaderQueue::new(config.loader_timeout);
        Self {
            phase: GamePhase::Loading,
            bus: EventBus::new(),
            registry: EntityRegistry::new(),
            stage,
            player: Player::new(Vec3::ZERO),
            inventory: Inventory::new(config.inventory_capacity),
            health: Health::new(config.max_health),
            radio: RadioPlayer::new(sink, default_playlist()),
            loader,
            tasks: DelayQueue::new(),
            battle: None,
            dialogue: None,
            config,
            data,
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn loader(&self) -> &LoaderQueue {
        &self.loader
    }

    pub fn radio(&self) -> &RadioPlayer {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut RadioPlayer {
        &mut self.radio
    }

    pub fn battle(&self) -> Option<&QuizBattle> {
        self.battle.as_ref()
    }

    pub fn dialogue(&self) -> Option<&DialogueSession> {
        self.dialogue.as_ref()
    }

    /// A battle or conversation is open; world input is locked.
    pub fn is_modal(&self) -> bool {
        self.battle.is_some() || self.dialogue.is_some()
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::debug!("phase transition: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    // ---- boot ----

    /// Register a boot task. Only useful before [`Game::begin_loading`].
    pub fn register_load_task(&mut self, name: impl Into<String>) {
        self.loader.register(name);
    }

    /// Announce the boot tasks and arm the loading watchdog. With no
    /// tasks registered the session goes straight to Playing.
    pub fn begin_loading(&mut self) {
        self.loader.start(&self.bus);
        self.maybe_finish_loading();
    }

    /// Report a boot task finished.
    pub fn load_task_done(&mut self, name: &str) {
        self.loader.mark_done(name, &self.bus);
        self.maybe_finish_loading();
    }

    /// Report a boot task failed. Failures degrade; the session still
    /// starts once everything has reported.
    pub fn load_task_failed(&mut self, name: &str, message: impl Into<String>) {
        self.loader.mark_failed(name, message, &self.bus);
        self.maybe_finish_loading();
    }

    fn maybe_finish_loading(&mut self) {
        if self.phase != GamePhase::Loading || !self.loader.is_complete() {
            return;
        }
        self.enter_realm(self.config.starting_realm);
        self.set_phase(GamePhase::Playing);
        self.bus.publish(GameEvent::HealthChanged {
            current: self.health.current(),
            max: self.health.max(),
        });
    }

    // ---- frame loop ----

    /// Advance the session one frame.
    pub fn tick(&mut self, dt: f32, input: &InputSample) {
        match self.phase {
            GamePhase::Loading => {
                self.loader.tick(dt, &self.bus);
                self.maybe_finish_loading();
            }
            GamePhase::Playing => {
                if input.pause {
                    self.pause(PauseSource::Menu);
                } else {
                    self.tick_playing(dt, input);
                }
            }
            GamePhase::Paused(_) => {
                // The radio keeps humming in the pause menu; the world
                // clock does not move.
                self.radio.tick(dt);
                if input.pause {
                    self.resume();
                }
            }
            GamePhase::GameOver => {}
        }
    }

    fn tick_playing(&mut self, dt: f32, input: &InputSample) {
        self.radio.tick(dt);

        if !self.is_modal() {
            self.player.integrate(input, dt, &self.config);
        }
        self.bus.publish(GameEvent::PlayerMoved {
            position: self.player.position,
            yaw: self.player.yaw,
        });

        if input.talk {
            self.talk();
        }

        // Talk may just have opened a conversation; re-check before
        // scanning so a modal frame stays frozen.
        if !self.is_modal() && !self.rng.gen_bool(self.config.scan_skip_chance) {
            let transitions = scan(
                self.registry.world_mut(),
                self.player.position,
                &self.config.npc_awareness,
                &self.config.foe_awareness,
            );
            self.apply_transitions(transitions);
        }

        for action in self.tasks.tick(dt) {
            self.run_delayed(action);
        }
    }

    /// Reposition the player directly. Scripted sequences use this
    /// instead of synthesizing input.
    pub fn teleport_player(&mut self, to: Vec3) {
        self.player.teleport(to);
    }

    // ---- proximity ----

    fn apply_transitions(&mut self, transitions: Vec<Transition>) {
        for transition in transitions {
            match transition {
                Transition::Notice(id) => self.on_notice(id),
                Transition::Withdraw(id) => self.on_withdraw(id),
                Transition::OpenBattle(id) => self.open_battle(id),
            }
        }
    }

    fn on_notice(&mut self, id: EntityId) {
        if id.kind() == EntityKind::Foe {
            self.set_tint(&id, Tint::Alerted);
            self.bus.publish(GameEvent::FoeEngaging { foe: id });
        } else {
            // NPCs notice silently; the UI draws its talk prompt from
            // the position stream.
            log::debug!("{} noticed the player", id);
        }
    }

    fn on_withdraw(&mut self, id: EntityId) {
        if id.kind() == EntityKind::Foe {
            self.set_tint(&id, Tint::Neutral);
            self.bus.publish(GameEvent::FoeDisengaged { foe: id });
        } else {
            log::debug!("{} lost interest", id);
        }
    }

    // ---- quiz battles ----

    fn open_battle(&mut self, foe: EntityId) {
        if self.is_modal() {
            // Two foes can cross their engage radius on the same scan;
            // the second backs off and gets its turn later.
            self.set_interact_state(&foe, InteractState::Engaging);
            return;
        }
        let Some(bank_id) = self.quiz_bank_of(&foe) else {
            log::warn!("{} has no quiz bank, backing out of battle", foe);
            self.set_interact_state(&foe, InteractState::Engaging);
            return;
        };
        let Some(bank) = self.data.quiz_bank(&bank_id) else {
            log::warn!("quiz bank '{}' missing for {}, backing out", bank_id, foe);
            self.set_interact_state(&foe, InteractState::Engaging);
            return;
        };
        let questions = bank.questions.clone();
        let battle = QuizBattle::start(
            foe.clone(),
            questions,
            self.config.questions_per_battle,
            &mut self.rng,
        );
        let Some(question) = battle.current_question() else {
            log::warn!("quiz bank '{}' is empty, backing out", bank_id);
            self.set_interact_state(&foe, InteractState::Engaging);
            return;
        };
        let name = self
            .registry
            .name_of(&foe)
            .unwrap_or_else(|| foe.to_string());
        log::info!("quiz battle: {} ({} questions)", name, battle.max_score());
        self.battle = Some(battle);
        self.bus.publish(GameEvent::FoeInteract { foe: foe.clone() });
        self.bus.publish(GameEvent::QuizStarted { foe, question });
    }

    /// Submit an answer for the posed question. Ignored while the
    /// between-question delay is running or when no battle is open.
    pub fn answer_quiz(&mut self, choice: usize) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(battle) = self.battle.as_mut() else {
            log::warn!("answer {} with no battle open", choice);
            return;
        };
        let foe = battle.foe().clone();
        let feedback = match battle.answer(choice) {
            Ok(feedback) => feedback,
            Err(e) => {
                log::debug!("answer ignored: {}", e);
                return;
            }
        };
        let tint = if feedback.correct {
            Tint::Correct
        } else {
            Tint::Incorrect
        };
        self.set_tint(&foe, tint);
        self.tasks.schedule(
            self.config.tint_flash_duration,
            DelayedAction::ClearTint {
                entity: foe.clone(),
            },
        );
        self.tasks.schedule(
            self.config.quiz_advance_delay,
            DelayedAction::AdvanceQuiz { foe: foe.clone() },
        );
        self.bus.publish(GameEvent::QuizAnswerResult {
            foe,
            correct: feedback.correct,
            correct_option: feedback.correct_option,
            explanation: feedback.explanation,
        });
    }

    /// Move the battle past its answered question. Fizzles if the battle
    /// is gone or belongs to a different foe by the time the timer fires.
    fn advance_battle(&mut self, foe: EntityId) {
        let Some(battle) = self.battle.as_mut() else {
            log::debug!("quiz advance for {} fizzled: no battle open", foe);
            return;
        };
        if battle.foe() != &foe {
            log::debug!("quiz advance for {} fizzled: different battle open", foe);
            return;
        }
        match battle.advance() {
            Ok(BattleStep::Next(question)) => {
                self.bus
                    .publish(GameEvent::QuizNextQuestion { foe, question });
            }
            Ok(BattleStep::Finished(outcome)) => self.finish_battle(foe, outcome),
            Err(e) => log::debug!("quiz advance for {} fizzled: {}", foe, e),
        }
    }

    fn finish_battle(&mut self, foe: EntityId, outcome: BattleOutcome) {
        self.battle = None;
        if outcome.defeated {
            self.registry.mark_defeated(&foe);
            self.set_interact_state(&foe, InteractState::Defeated);
            self.set_tint(&foe, Tint::Defeated);
        } else {
            self.set_interact_state(&foe, InteractState::Idle);
            self.set_tint(&foe, Tint::Neutral);
        }
        let name = self
            .registry
            .name_of(&foe)
            .unwrap_or_else(|| foe.to_string());
        log::info!(
            "quiz over: {} {} ({}/{})",
            name,
            if outcome.defeated {
                "defeated"
            } else {
                "holds the floor"
            },
            outcome.score,
            outcome.max_score
        );
        self.bus.publish(GameEvent::QuizEnded {
            foe: foe.clone(),
            score: outcome.score,
            max_score: outcome.max_score,
            defeated: outcome.defeated,
        });
        if outcome.defeated {
            self.bus.publish(GameEvent::FoeDefeated { foe });
        }
    }

    /// Close an open battle without an outcome. The foe drops back to
    /// Idle and its timers die.
    fn abandon_battle(&mut self) {
        let Some(battle) = self.battle.take() else {
            return;
        };
        let foe = battle.foe().clone();
        self.tasks.cancel_owned(&foe);
        self.set_interact_state(&foe, InteractState::Idle);
        self.set_tint(&foe, Tint::Neutral);
        log::debug!("battle against {} abandoned", foe);
        self.bus.publish(GameEvent::QuizEnded {
            foe,
            score: battle.score(),
            max_score: battle.max_score(),
            defeated: false,
        });
    }

    // ---- dialogue ----

    /// Handle a talk press: advance or close an open conversation, or
    /// start one with the nearest engaging NPC within reach.
    pub fn talk(&mut self) {
        if self.phase != GamePhase::Playing || self.battle.is_some() {
            return;
        }
        if let Some(session) = &self.dialogue {
            // Mid-conversation the talk key only closes a terminal line;
            // anything else waits for a response choice.
            if session.is_terminal() {
                self.end_dialogue();
            }
            return;
        }
        let Some(npc) = self.nearest_reachable_npc() else {
            return;
        };
        self.start_dialogue(npc);
    }

    /// The closest NPC within talk reach that is not already mid-scene.
    fn nearest_reachable_npc(&self) -> Option<EntityId> {
        let player = self.player.position;
        let reach = self.config.npc_awareness.engage_radius;
        self.registry
            .world()
            .query::<(&Identity, &Position, &Awareness, &Npc)>()
            .iter()
            .filter(|(_, (_, position, awareness, _))| {
                awareness.state.scannable()
                    && player.horizontal_distance(&position.0) <= reach
            })
            .map(|(_, (identity, position, _, _))| {
                (identity.0.clone(), player.horizontal_distance(&position.0))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn start_dialogue(&mut self, npc: EntityId) {
        let Some(script_id) = self.script_of(&npc) else {
            log::warn!("{} has no dialogue script", npc);
            return;
        };
        let Some(script) = self.data.dialogue_script(&script_id) else {
            log::warn!("dialogue script '{}' missing for {}", script_id, npc);
            return;
        };
        let session = match DialogueSession::start(npc.clone(), script.clone()) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("refusing to talk to {}: {}", npc, e);
                return;
            }
        };
        let turn = session.turn();
        let name = self
            .registry
            .name_of(&npc)
            .unwrap_or_else(|| npc.to_string());
        log::info!("talking to {}", name);
        self.set_interact_state(&npc, InteractState::Dialogue);
        self.dialogue = Some(session);
        self.bus.publish(GameEvent::NpcInteract { npc: npc.clone() });
        self.bus.publish(GameEvent::DialogueStarted { npc, turn });
    }

    /// Pick a response in the open conversation.
    pub fn choose_response(&mut self, choice: usize) {
        let Some(session) = self.dialogue.as_mut() else {
            log::warn!("response {} with no conversation open", choice);
            return;
        };
        let npc = session.npc().clone();
        match session.respond(choice) {
            Ok(next) => {
                let ended = next.is_none();
                self.bus.publish(GameEvent::DialogueResponded {
                    npc,
                    choice,
                    next,
                });
                if ended {
                    self.end_dialogue();
                }
            }
            Err(e) => log::warn!("bad response in conversation with {}: {}", npc, e),
        }
    }

    fn end_dialogue(&mut self) {
        let Some(session) = self.dialogue.take() else {
            return;
        };
        let npc = session.npc().clone();
        self.set_interact_state(&npc, InteractState::Idle);
        log::debug!("conversation with {} over", npc);
        self.bus.publish(GameEvent::DialogueEnded { npc });
    }

    // ---- realms ----

    /// Tear down the current realm and build `index`'s population. Any
    /// open battle or conversation ends with it, along with every timer.
    pub fn change_realm(&mut self, index: usize) {
        if matches!(self.phase, GamePhase::Loading | GamePhase::GameOver) {
            log::warn!("realm change refused during {:?}", self.phase);
            return;
        }
        self.abandon_battle();
        self.end_dialogue();
        self.enter_realm(index);
    }

    fn enter_realm(&mut self, index: usize) {
        let Some(def) = self.data.realm(index) else {
            log::warn!(
                "no realm {}, staying in realm {}",
                index,
                self.registry.realm()
            );
            return;
        };
        let name = def.name.clone();
        let spawn = def.spawn;
        self.tasks.cancel_all();
        self.registry.rebuild(index, def, &mut *self.stage);
        self.player.teleport(spawn);
        self.bus
            .publish(GameEvent::RealmChanged { realm: index, name });
    }

    // ---- timers ----

    fn run_delayed(&mut self, action: DelayedAction) {
        match action {
            DelayedAction::AdvanceQuiz { foe } => self.advance_battle(foe),
            DelayedAction::ClearTint { entity } => self.restore_tint(entity),
        }
    }

    fn restore_tint(&mut self, entity: EntityId) {
        let Some(state) = self.interact_state_of(&entity) else {
            return;
        };
        self.set_tint(&entity, Self::resting_tint(state));
    }

    /// The color a foe rests at in each state; the answer flash reverts
    /// to this.
    fn resting_tint(state: InteractState) -> Tint {
        match state {
            InteractState::Idle => Tint::Neutral,
            InteractState::Engaging | InteractState::Battle | InteractState::Dialogue => {
                Tint::Alerted
            }
            InteractState::Defeated => Tint::Defeated,
        }
    }

    // ---- pause ----

    /// Freeze the world. The radio keeps playing; the session clock and
    /// every timer stop.
    pub fn pause(&mut self, source: PauseSource) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.set_phase(GamePhase::Paused(source));
        self.bus.publish(GameEvent::GamePaused { source });
    }

    pub fn resume(&mut self) {
        let GamePhase::Paused(source) = self.phase else {
            return;
        };
        self.set_phase(GamePhase::Playing);
        self.bus.publish(GameEvent::GameResumed { source });
    }

    // ---- health ----

    /// Overwrite the health bar, e.g. for a host applying a difficulty
    /// preset. Setting it to zero ends the session just like damage.
    pub fn set_health(&mut self, current: i32, max: i32) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let before = self.health;
        let emptied = self.health.set(current, max);
        if self.health != before {
            self.bus.publish(GameEvent::HealthChanged {
                current: self.health.current(),
                max: self.health.max(),
            });
        }
        if emptied {
            log::info!("health set to zero, session over");
            self.set_phase(GamePhase::GameOver);
        }
    }

    /// Hurt the player. The call that empties the bar ends the session.
    pub fn damage_player(&mut self, amount: i32) {
        if matches!(self.phase, GamePhase::Loading | GamePhase::GameOver) {
            return;
        }
        let before = self.health.current();
        let emptied = self.health.damage(amount);
        if self.health.current() != before {
            self.bus.publish(GameEvent::HealthChanged {
                current: self.health.current(),
                max: self.health.max(),
            });
        }
        if emptied {
            log::info!("health hit zero, session over");
            self.set_phase(GamePhase::GameOver);
        }
    }

    pub fn heal_player(&mut self, amount: i32) {
        if matches!(self.phase, GamePhase::Loading | GamePhase::GameOver) {
            return;
        }
        if self.health.heal(amount) > 0 {
            self.bus.publish(GameEvent::HealthChanged {
                current: self.health.current(),
                max: self.health.max(),
            });
        }
    }

    // ---- inventory ----

    /// Put `count` of an item in the player's pocket.
    pub fn give_item(&mut self, def: ItemDef, count: u32) -> Result<(), InventoryError> {
        let id = def.id.clone();
        match self.inventory.add(def, count) {
            Ok(total) => {
                self.bus.publish(GameEvent::ItemAdded { id, count: total });
                Ok(())
            }
            Err(e) => {
                log::warn!("pickup of '{}' refused: {}", id, e);
                Err(e)
            }
        }
    }

    /// Drop `count` of item `id`.
    pub fn drop_item(&mut self, id: &str, count: u32) -> Result<(), InventoryError> {
        match self.inventory.remove(id, count) {
            Ok(remaining) => {
                self.bus.publish(GameEvent::ItemRemoved {
                    id: id.to_string(),
                    remaining,
                });
                Ok(())
            }
            Err(e) => {
                log::warn!("drop of '{}' refused: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn select_item(&mut self, index: usize) -> Result<(), InventoryError> {
        match self.inventory.select(index) {
            Ok(stack) => {
                let id = stack.def.id.clone();
                self.bus.publish(GameEvent::ItemSelected { index, id });
                Ok(())
            }
            Err(e) => {
                log::warn!("cannot select slot {}: {}", index, e);
                Err(e)
            }
        }
    }

    pub fn wear_item(&mut self, id: &str) -> Result<(), InventoryError> {
        match self.inventory.wear(id) {
            Ok(displaced) => {
                if let Some(previous) = displaced {
                    self.bus.publish(GameEvent::ItemUnequipped { id: previous });
                }
                self.bus
                    .publish(GameEvent::ItemEquipped { id: id.to_string() });
                Ok(())
            }
            Err(e) => {
                log::warn!("cannot wear '{}': {}", id, e);
                Err(e)
            }
        }
    }

    pub fn take_off_item(&mut self) {
        if let Some(id) = self.inventory.take_off() {
            self.bus.publish(GameEvent::ItemUnequipped { id });
        }
    }

    /// Consume the selected item if it is consumable, restoring health.
    /// Anything else selected is a quiet no-op.
    pub fn use_selected_item(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(stack) = self.inventory.selected_stack() else {
            log::debug!("use pressed with nothing selected");
            return;
        };
        let def = stack.def.clone();
        if !def.is_consumable() {
            log::debug!("'{}' is not consumable", def.id);
            return;
        }
        match self.inventory.remove(&def.id, 1) {
            Ok(remaining) => {
                self.bus.publish(GameEvent::ItemRemoved {
                    id: def.id.clone(),
                    remaining,
                });
                self.heal_player(def.heal_amount());
            }
            Err(e) => log::warn!("could not consume '{}': {}", def.id, e),
        }
    }

    // ---- world access helpers ----

    fn set_interact_state(&mut self, id: &EntityId, state: InteractState) {
        let Some(entity) = self.registry.entity(id) else {
            return;
        };
        if let Ok(mut awareness) = self.registry.world_mut().get::<&mut Awareness>(entity) {
            awareness.state = state;
        }
    }

    fn interact_state_of(&self, id: &EntityId) -> Option<InteractState> {
        let entity = self.registry.entity(id)?;
        self.registry
            .world()
            .get::<&Awareness>(entity)
            .ok()
            .map(|a| a.state)
    }

    fn quiz_bank_of(&self, id: &EntityId) -> Option<String> {
        let entity = self.registry.entity(id)?;
        self.registry
            .world()
            .get::<&Foe>(entity)
            .ok()
            .map(|f| f.quiz.clone())
    }

    fn script_of(&self, id: &EntityId) -> Option<String> {
        let entity = self.registry.entity(id)?;
        self.registry
            .world()
            .get::<&Npc>(entity)
            .ok()
            .map(|n| n.script.clone())
    }

    /// Recolor a resident's avatar. A resident gone by the time a flash
    /// timer fires is skipped quietly.
    fn set_tint(&mut self, id: &EntityId, tint: Tint) {
        let Some(handle) = self.registry.avatar_of(id) else {
            return;
        };
        if let Err(e) = self.stage.set_tint(handle, tint) {
            log::warn!("tint update for {} failed: {}", id, e);
        }
    }
}
