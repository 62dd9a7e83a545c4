//! # Monster AI
//!
//! Each non-player actor carries an [`Ai`] that picks its action for the turn.
//! The AI is taken out of the actor while it decides and put back before the
//! chosen action runs, so a replacement (a confused monster recovering, for
//! instance) is visible to the action itself.

use crate::{
    find_path, Action, BumpAction, ConcreteAction, Direction, Entity, EntityId, GameEvent,
    GameMap, GameState, MeleeAction, MessageImportance, MoveAction, Position, RogueResult,
    WaitAction,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Behavior of a non-player actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ai {
    /// Chases and attacks the player while it is in sight.
    Hostile {
        /// Remaining steps toward the player's last seen position
        path: Vec<Position>,
    },
    /// Stumbles around at random, then reverts to `previous`.
    Confused {
        previous: Box<Ai>,
        turns_remaining: u32,
    },
}

/// What an AI decided to do this turn.
#[derive(Debug, Clone)]
enum TurnPlan {
    Act(ConcreteAction),
    Announce(GameEvent),
}

impl Ai {
    pub fn hostile() -> Self {
        Ai::Hostile { path: Vec::new() }
    }

    /// Wraps `previous` in a confusion lasting `turns` turns.
    pub fn confused(previous: Ai, turns: u32) -> Self {
        Ai::Confused {
            previous: Box::new(previous),
            turns_remaining: turns,
        }
    }

    /// Stable name used in save files.
    pub fn type_name(&self) -> &'static str {
        match self {
            Ai::Hostile { .. } => "hostile",
            Ai::Confused { .. } => "confused",
        }
    }

    /// Turns left for a confused AI; 0 otherwise.
    pub fn confused_turns_remaining(&self) -> u32 {
        match self {
            Ai::Confused { turns_remaining, .. } => *turns_remaining,
            Ai::Hostile { .. } => 0,
        }
    }

    /// Chooses this turn's action. Returns the AI the actor carries
    /// afterwards along with the plan.
    fn plan(
        self,
        me: &Entity,
        map: &GameMap,
        target: Position,
        rng: &mut StdRng,
    ) -> (Ai, TurnPlan) {
        match self {
            Ai::Hostile { mut path } => {
                let origin = me.position;
                if map.is_visible(origin) {
                    if origin.chebyshev_distance(target) <= 1 {
                        if let Some(direction) = Direction::from_delta(target - origin) {
                            let action = ConcreteAction::Melee(MeleeAction {
                                actor: me.id,
                                direction,
                            });
                            return (Ai::Hostile { path }, TurnPlan::Act(action));
                        }
                    }
                    path = find_path(map, origin, target);
                }

                if !path.is_empty() {
                    let next = path.remove(0);
                    if let Some(direction) = Direction::from_delta(next - origin) {
                        let action = ConcreteAction::Move(MoveAction {
                            actor: me.id,
                            direction,
                        });
                        return (Ai::Hostile { path }, TurnPlan::Act(action));
                    }
                    // A stale path that no longer starts next to us is useless.
                    path.clear();
                }

                let action = ConcreteAction::Wait(WaitAction { actor: me.id });
                (Ai::Hostile { path }, TurnPlan::Act(action))
            }
            Ai::Confused {
                previous,
                turns_remaining,
            } => {
                if turns_remaining == 0 {
                    let event = GameEvent::message(
                        format!("The {} is no longer confused.", me.name),
                        MessageImportance::StatusEffect,
                    );
                    return (*previous, TurnPlan::Announce(event));
                }

                let direction = Direction::all()
                    .choose(rng)
                    .copied()
                    .unwrap_or(Direction::North);
                let action = ConcreteAction::Bump(BumpAction {
                    actor: me.id,
                    direction,
                });
                (
                    Ai::Confused {
                        previous,
                        turns_remaining: turns_remaining - 1,
                    },
                    TurnPlan::Act(action),
                )
            }
        }
    }
}

/// Runs one turn for the actor `actor_id`.
///
/// Actors without an AI (the player, the dead) do nothing.
pub fn take_turn(state: &mut GameState, actor_id: EntityId) -> RogueResult<Vec<GameEvent>> {
    let Some(target) = state.player_position() else {
        return Ok(Vec::new());
    };
    let Some(ai) = state
        .map
        .entity_mut(actor_id)
        .and_then(Entity::as_actor_mut)
        .and_then(|actor| actor.ai.take())
    else {
        return Ok(Vec::new());
    };

    let me = state.entity(actor_id)?.clone();
    let (next, plan) = ai.plan(&me, &state.map, target, &mut state.rng);

    if let Some(actor) = state.map.entity_mut(actor_id).and_then(Entity::as_actor_mut) {
        actor.ai = Some(next);
    }

    match plan {
        TurnPlan::Act(action) => action.execute(state),
        TurnPlan::Announce(event) => Ok(vec![event]),
    }
}
