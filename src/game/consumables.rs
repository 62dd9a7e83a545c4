//! # Consumable Effects
//!
//! What happens when a potion is drunk or a scroll is read. Each effect checks
//! its preconditions first and only then touches the game; a failed check is an
//! [`RogueError::Impossible`] and the item stays in the inventory.

use crate::components::Consumable;
use crate::{
    Ai, EntityId, GameEvent, GameState, ItemAction, MessageImportance, RogueError, RogueResult,
};

/// Applies `consumable` on behalf of `action.actor`.
pub fn activate(
    consumable: Consumable,
    action: &ItemAction,
    item_name: &str,
    state: &mut GameState,
) -> RogueResult<Vec<GameEvent>> {
    match consumable {
        Consumable::Healing { amount } => heal(state, action.actor, item_name, amount),
        Consumable::Lightning {
            damage,
            maximum_range,
        } => lightning(state, action.actor, damage, maximum_range),
        Consumable::Confusion { number_of_turns } => {
            confuse(state, action, number_of_turns)
        }
        Consumable::Fireball { damage, radius } => fireball(state, action, damage, radius),
    }
}

fn heal(
    state: &mut GameState,
    consumer: EntityId,
    item_name: &str,
    amount: i32,
) -> RogueResult<Vec<GameEvent>> {
    let recovered = state.actor_mut(consumer)?.fighter.heal(amount);
    if recovered <= 0 {
        return Err(RogueError::impossible("Your health is already full."));
    }
    Ok(vec![GameEvent::message(
        format!("You consume the {}, and recover {} HP!", item_name, recovered),
        MessageImportance::HealthRecovered,
    )])
}

/// Strikes the closest visible living actor other than the consumer.
fn lightning(
    state: &mut GameState,
    consumer: EntityId,
    damage: i32,
    maximum_range: f64,
) -> RogueResult<Vec<GameEvent>> {
    let origin = state.entity(consumer)?.position;
    let mut closest_distance = maximum_range + 1.0;
    let mut target = None;

    for entity in state.map.living_actors() {
        if entity.id == consumer || !state.map.is_visible(entity.position) {
            continue;
        }
        let distance = entity.distance(origin);
        if distance < closest_distance {
            closest_distance = distance;
            target = Some((entity.id, entity.name.clone()));
        }
    }

    let (target_id, target_name) =
        target.ok_or_else(|| RogueError::impossible("No enemy is close enough to strike."))?;

    let mut events = vec![GameEvent::message(
        format!(
            "A lighting bolt strikes the {} with a loud thunder, for {} damage!",
            target_name, damage
        ),
        MessageImportance::PlayerAttack,
    )];
    events.extend(state.apply_damage(target_id, damage, Some(consumer)));
    Ok(events)
}

fn confuse(
    state: &mut GameState,
    action: &ItemAction,
    number_of_turns: u32,
) -> RogueResult<Vec<GameEvent>> {
    let position = action
        .target
        .ok_or_else(|| RogueError::impossible("You must select an enemy to target."))?;
    if !state.map.is_visible(position) {
        return Err(RogueError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    let target = state
        .map
        .actor_at(position)
        .ok_or_else(|| RogueError::impossible("You must select an enemy to target."))?;
    if target.id == action.actor {
        return Err(RogueError::impossible("You cannot confuse yourself!"));
    }
    let target_id = target.id;
    let text = format!(
        "The eyes of the {} look vacant, as it starts to stumble around!",
        target.name
    );

    let actor = state.actor_mut(target_id)?;
    let previous = actor.ai.take().unwrap_or_else(Ai::hostile);
    actor.ai = Some(Ai::confused(previous, number_of_turns));

    Ok(vec![GameEvent::message(text, MessageImportance::StatusEffect)])
}

/// Damages every living actor within `radius` of the target, the consumer
/// included.
fn fireball(
    state: &mut GameState,
    action: &ItemAction,
    damage: i32,
    radius: f64,
) -> RogueResult<Vec<GameEvent>> {
    let position = action
        .target
        .ok_or_else(|| RogueError::impossible("You must select an area to target."))?;
    if !state.map.is_visible(position) {
        return Err(RogueError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }

    let targets: Vec<(EntityId, String)> = state
        .map
        .living_actors()
        .filter(|entity| entity.distance(position) <= radius)
        .map(|entity| (entity.id, entity.name.clone()))
        .collect();
    if targets.is_empty() {
        return Err(RogueError::impossible("There are no targets in the radius."));
    }

    let mut events = Vec::new();
    for (target_id, name) in targets {
        events.push(GameEvent::message(
            format!(
                "The {} is engulfed in a fiery explosion, taking {} damage!",
                name, damage
            ),
            MessageImportance::PlayerAttack,
        ));
        events.extend(state.apply_damage(target_id, damage, Some(action.actor)));
    }
    Ok(events)
}
