//! Proximity scan
//!
//! One pass of the awareness machine over every resident. Distances are
//! measured on the horizontal plane so a foe on a mezzanine still
//! notices a player walking underneath. Each resident moves at most one
//! state per scan; a player teleported from far away to point blank gets
//! noticed on one scan and battled on the next.
//!
//! The scan commits its state changes to the world immediately and
//! returns the list of transitions. The session narrates those over the
//! bus afterward, so every event describes a state that is already true.

use hecs::World;

use crate::config::AwarenessConfig;
use crate::entities::{Awareness, Foe, Identity, Npc, Position};
use crate::math::Vec3;

use super::state::{InteractState, Transition};

pub fn scan(
    world: &mut World,
    player: Vec3,
    npc_config: &AwarenessConfig,
    foe_config: &AwarenessConfig,
) -> Vec<Transition> {
    let mut transitions = Vec::new();

    for (_, (identity, position, awareness, _)) in world
        .query::<(&Identity, &Position, &mut Awareness, &Npc)>()
        .iter()
    {
        if !awareness.state.scannable() {
            continue;
        }
        let distance = player.horizontal_distance(&position.0);
        match awareness.state {
            InteractState::Idle if distance <= npc_config.enter_radius => {
                awareness.state = InteractState::Engaging;
                transitions.push(Transition::Notice(identity.0.clone()));
            }
            InteractState::Engaging if distance > npc_config.exit_radius => {
                awareness.state = InteractState::Idle;
                transitions.push(Transition::Withdraw(identity.0.clone()));
            }
            _ => {}
        }
    }

    for (_, (identity, position, awareness, foe)) in world
        .query::<(&Identity, &Position, &mut Awareness, &Foe)>()
        .iter()
    {
        if foe.defeated || !awareness.state.scannable() {
            continue;
        }
        let distance = player.horizontal_distance(&position.0);
        match awareness.state {
            InteractState::Idle if distance <= foe_config.enter_radius => {
                awareness.state = InteractState::Engaging;
                transitions.push(Transition::Notice(identity.0.clone()));
            }
            InteractState::Engaging if distance <= foe_config.engage_radius => {
                awareness.state = InteractState::Battle;
                transitions.push(Transition::OpenBattle(identity.0.clone()));
            }
            InteractState::Engaging if distance > foe_config.exit_radius => {
                awareness.state = InteractState::Idle;
                transitions.push(Transition::Withdraw(identity.0.clone()));
            }
            _ => {}
        }
    }

    transitions
}
