//! # Actions
//!
//! Every change to the game world happens through an [`Action`]. An action
//! validates everything it needs before it mutates anything; when it cannot
//! go ahead it fails with [`RogueError::Impossible`] and leaves the state as
//! it found it.

use crate::{
    consumables, Direction, Entity, EntityId, GameState, MessageImportance, Position, RogueError,
    RogueResult,
};
use tracing::debug;

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A line for the message log
    Message {
        text: String,
        importance: MessageImportance,
    },
    EntityMoved {
        entity_id: EntityId,
        from: Position,
        to: Position,
    },
    EntityDamaged {
        entity_id: EntityId,
        damage: i32,
        source: Option<EntityId>,
    },
    EntityDied {
        entity_id: EntityId,
        killer: Option<EntityId>,
    },
    ItemPickedUp {
        entity_id: EntityId,
        item_id: EntityId,
    },
    ItemDropped {
        entity_id: EntityId,
        item_id: EntityId,
    },
    ItemConsumed {
        entity_id: EntityId,
        item_id: EntityId,
    },
    FloorChanged {
        floor: u32,
    },
}

impl GameEvent {
    pub fn message(text: impl Into<String>, importance: MessageImportance) -> Self {
        GameEvent::Message {
            text: text.into(),
            importance,
        }
    }
}

/// Kinds of action, for logging and input mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Bump,
    Move,
    Melee,
    Wait,
    Pickup,
    Drop,
    UseItem,
    Equip,
    TakeStairs,
}

/// A validated, atomic change to the game.
pub trait Action {
    /// The entity performing the action.
    fn actor(&self) -> EntityId;

    fn action_type(&self) -> ActionType;

    /// Performs the action, returning what happened.
    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>>;
}

/// Melee if a living actor stands in the way, otherwise move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpAction {
    pub actor: EntityId,
    pub direction: Direction,
}

/// Step one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveAction {
    pub actor: EntityId,
    pub direction: Direction,
}

/// Attack the living actor one tile away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeleeAction {
    pub actor: EntityId,
    pub direction: Direction,
}

/// Pass the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitAction {
    pub actor: EntityId,
}

/// Pick up the first item on the actor's tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupAction {
    pub actor: EntityId,
}

/// Put a carried item down on the actor's tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropAction {
    pub actor: EntityId,
    pub item: EntityId,
}

/// Use a carried consumable, optionally at a target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAction {
    pub actor: EntityId,
    pub item: EntityId,
    pub target: Option<Position>,
}

/// Toggle a carried item in its equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipAction {
    pub actor: EntityId,
    pub item: EntityId,
}

/// Go down the stairs under the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeStairsAction {
    pub actor: EntityId,
}

/// Every action the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcreteAction {
    Bump(BumpAction),
    Move(MoveAction),
    Melee(MeleeAction),
    Wait(WaitAction),
    Pickup(PickupAction),
    Drop(DropAction),
    UseItem(ItemAction),
    Equip(EquipAction),
    TakeStairs(TakeStairsAction),
}

impl Action for ConcreteAction {
    fn actor(&self) -> EntityId {
        match self {
            ConcreteAction::Bump(action) => action.actor(),
            ConcreteAction::Move(action) => action.actor(),
            ConcreteAction::Melee(action) => action.actor(),
            ConcreteAction::Wait(action) => action.actor(),
            ConcreteAction::Pickup(action) => action.actor(),
            ConcreteAction::Drop(action) => action.actor(),
            ConcreteAction::UseItem(action) => action.actor(),
            ConcreteAction::Equip(action) => action.actor(),
            ConcreteAction::TakeStairs(action) => action.actor(),
        }
    }

    fn action_type(&self) -> ActionType {
        match self {
            ConcreteAction::Bump(action) => action.action_type(),
            ConcreteAction::Move(action) => action.action_type(),
            ConcreteAction::Melee(action) => action.action_type(),
            ConcreteAction::Wait(action) => action.action_type(),
            ConcreteAction::Pickup(action) => action.action_type(),
            ConcreteAction::Drop(action) => action.action_type(),
            ConcreteAction::UseItem(action) => action.action_type(),
            ConcreteAction::Equip(action) => action.action_type(),
            ConcreteAction::TakeStairs(action) => action.action_type(),
        }
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        debug!("Executing {:?} for {}", self.action_type(), self.actor());
        match self {
            ConcreteAction::Bump(action) => action.execute(state),
            ConcreteAction::Move(action) => action.execute(state),
            ConcreteAction::Melee(action) => action.execute(state),
            ConcreteAction::Wait(action) => action.execute(state),
            ConcreteAction::Pickup(action) => action.execute(state),
            ConcreteAction::Drop(action) => action.execute(state),
            ConcreteAction::UseItem(action) => action.execute(state),
            ConcreteAction::Equip(action) => action.execute(state),
            ConcreteAction::TakeStairs(action) => action.execute(state),
        }
    }
}

/// Position one step from `actor` in `direction`.
fn destination(state: &GameState, actor: EntityId, direction: Direction) -> RogueResult<Position> {
    Ok(state.entity(actor)?.position + direction.to_delta())
}

fn importance_for(
    state: &GameState,
    actor: EntityId,
    player: MessageImportance,
    other: MessageImportance,
) -> MessageImportance {
    if actor == state.player_id {
        player
    } else {
        other
    }
}

impl Action for BumpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Bump
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let dest = destination(state, self.actor, self.direction)?;
        if state.map.actor_at(dest).is_some() {
            MeleeAction {
                actor: self.actor,
                direction: self.direction,
            }
            .execute(state)
        } else {
            MoveAction {
                actor: self.actor,
                direction: self.direction,
            }
            .execute(state)
        }
    }
}

impl Action for MoveAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Move
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let from = state.entity(self.actor)?.position;
        let to = from + self.direction.to_delta();

        if !state.map.in_bounds(to)
            || !state.map.is_walkable(to)
            || state.map.blocking_entity_at(to).is_some()
        {
            return Err(RogueError::impossible("That way is blocked."));
        }

        if let Some(entity) = state.map.entity_mut(self.actor) {
            entity.position = to;
        }
        Ok(vec![GameEvent::EntityMoved {
            entity_id: self.actor,
            from,
            to,
        }])
    }
}

impl Action for MeleeAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Melee
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let dest = destination(state, self.actor, self.direction)?;
        let target = state
            .map
            .actor_at(dest)
            .ok_or_else(|| RogueError::impossible("Nothing to attack."))?;
        let target_id = target.id;
        let target_name = target.name.clone();
        let defense = target.as_actor().map(|actor| actor.defense()).unwrap_or(0);

        let attacker = state.entity(self.actor)?;
        let power = attacker
            .as_actor()
            .map(|actor| actor.power())
            .ok_or_else(|| RogueError::InvalidState(format!("{} cannot fight", attacker.name)))?;
        let description = format!("{} attacks {}", attacker.name, target_name);

        let importance = importance_for(
            state,
            self.actor,
            MessageImportance::PlayerAttack,
            MessageImportance::EnemyAttack,
        );
        let damage = power - defense;

        if damage > 0 {
            let mut events = vec![GameEvent::message(
                format!("{} for {} hit points.", description, damage),
                importance,
            )];
            events.extend(state.apply_damage(target_id, damage, Some(self.actor)));
            Ok(events)
        } else {
            Ok(vec![GameEvent::message(
                format!("{} but does no damage.", description),
                importance,
            )])
        }
    }
}

impl Action for WaitAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Wait
    }

    fn execute(&self, _state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        Ok(Vec::new())
    }
}

impl Action for PickupAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Pickup
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let position = state.entity(self.actor)?.position;
        let item_id = state
            .map
            .items_at(position)
            .next()
            .map(|item| item.id)
            .ok_or_else(|| RogueError::impossible("There is nothing here to pick up."))?;

        if state.actor(self.actor)?.inventory.is_full() {
            return Err(RogueError::impossible("Your inventory is full."));
        }

        let item = state
            .map
            .remove_entity(item_id)
            .ok_or_else(|| RogueError::InvalidState(format!("Item {} vanished", item_id)))?;
        let text = format!("You picked up the {}!", item.name);
        state.actor_mut(self.actor)?.inventory.items.push(item);

        Ok(vec![
            GameEvent::ItemPickedUp {
                entity_id: self.actor,
                item_id,
            },
            GameEvent::message(text, MessageImportance::Info),
        ])
    }
}

/// Looks up an item in the actor's inventory.
fn carried_item<'a>(
    state: &'a GameState,
    actor: EntityId,
    item: EntityId,
) -> RogueResult<&'a Entity> {
    state
        .actor(actor)?
        .inventory
        .get(item)
        .ok_or_else(|| RogueError::impossible("You don't have that item."))
}

impl Action for DropAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Drop
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        carried_item(state, self.actor, self.item)?;
        let position = state.entity(self.actor)?.position;

        let actor = state.actor_mut(self.actor)?;
        let mut events = Vec::new();
        let mut item = actor
            .inventory
            .remove(self.item)
            .ok_or_else(|| RogueError::impossible("You don't have that item."))?;
        if actor.equipment.unequip(self.item).is_some() {
            events.push(GameEvent::message(
                format!("You remove the {}.", item.name),
                MessageImportance::Info,
            ));
        }

        item.position = position;
        events.push(GameEvent::message(
            format!("You dropped the {}.", item.name),
            MessageImportance::Info,
        ));
        state.map.add_entity(item);
        events.push(GameEvent::ItemDropped {
            entity_id: self.actor,
            item_id: self.item,
        });
        Ok(events)
    }
}

impl Action for ItemAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::UseItem
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let item = carried_item(state, self.actor, self.item)?;
        let item_name = item.name.clone();
        let consumable = item
            .as_item()
            .and_then(|item| item.consumable)
            .ok_or_else(|| {
                RogueError::impossible(format!("The {} cannot be used.", item_name))
            })?;

        let mut events = consumables::activate(consumable, self, &item_name, state)?;

        // Only a successful activation uses the item up.
        state.actor_mut(self.actor)?.inventory.remove(self.item);
        events.push(GameEvent::ItemConsumed {
            entity_id: self.actor,
            item_id: self.item,
        });
        Ok(events)
    }
}

impl Action for EquipAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Equip
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        let item = carried_item(state, self.actor, self.item)?;
        let item_name = item.name.clone();
        let equippable = item
            .as_item()
            .and_then(|item| item.equippable)
            .ok_or_else(|| {
                RogueError::impossible(format!("The {} cannot be equipped.", item_name))
            })?;

        let actor = state.actor_mut(self.actor)?;
        if actor.equipment.unequip(self.item).is_some() {
            return Ok(vec![GameEvent::message(
                format!("You remove the {}.", item_name),
                MessageImportance::Info,
            )]);
        }

        let mut events = Vec::new();
        if let Some(previous) = actor.equipment.equip(self.item, equippable) {
            if let Some(old) = actor.inventory.get(previous.item) {
                events.push(GameEvent::message(
                    format!("You remove the {}.", old.name),
                    MessageImportance::Info,
                ));
            }
        }
        events.push(GameEvent::message(
            format!("You equip the {}.", item_name),
            MessageImportance::Info,
        ));
        Ok(events)
    }
}

impl Action for TakeStairsAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::TakeStairs
    }

    fn execute(&self, state: &mut GameState) -> RogueResult<Vec<GameEvent>> {
        if self.actor != state.player_id {
            return Err(RogueError::impossible("Only the player can use the stairs."));
        }
        state.descend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorKind, GameMap, GenerationConfig, ItemKind, Tile};

    /// 12x12 walled room with the player at (5, 5).
    fn arena() -> GameState {
        let mut map = GameMap::new(12, 12);
        for y in 1..11 {
            for x in 1..11 {
                map.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        let player_id = map.add_entity(ActorKind::Player.spawn(Position::new(5, 5)));
        GameState::from_parts(map, player_id, 1, GenerationConfig::for_testing(3))
    }

    fn player_item(state: &GameState, kind: ItemKind) -> EntityId {
        state
            .player_actor()
            .unwrap()
            .inventory
            .items
            .iter()
            .find(|item| item.as_item().map(|i| i.kind) == Some(kind))
            .map(|item| item.id)
            .unwrap()
    }

    fn texts(events: &[GameEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Message { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_move_into_blocked_tiles_fails() {
        let mut state = arena();
        let player = state.player_id;
        state.map.add_entity(ActorKind::Orc.spawn(Position::new(6, 5)));

        let east = MoveAction {
            actor: player,
            direction: Direction::East,
        };
        let err = east.execute(&mut state).unwrap_err();
        assert_eq!(err.to_string(), "That way is blocked.");
        assert_eq!(state.player_position(), Some(Position::new(5, 5)));

        let west = MoveAction {
            actor: player,
            direction: Direction::West,
        };
        west.execute(&mut state).unwrap();
        assert_eq!(state.player_position(), Some(Position::new(4, 5)));
    }

    #[test]
    fn test_move_off_the_map_fails() {
        let mut map = GameMap::new(3, 3);
        map.set_tile(Position::new(0, 0), Tile::floor()).unwrap();
        let player = map.add_entity(ActorKind::Player.spawn(Position::new(0, 0)));
        let mut state = GameState::from_parts(map, player, 1, GenerationConfig::for_testing(1));

        let action = MoveAction {
            actor: player,
            direction: Direction::Northwest,
        };
        assert!(action.execute(&mut state).unwrap_err().is_impossible());
    }

    #[test]
    fn test_bump_attacks_or_moves() {
        let mut state = arena();
        let player = state.player_id;
        let orc = state.map.add_entity(ActorKind::Orc.spawn(Position::new(6, 5)));

        let events = BumpAction {
            actor: player,
            direction: Direction::East,
        }
        .execute(&mut state)
        .unwrap();
        // Player power 2 + dagger 2 against orc defense 0.
        assert_eq!(texts(&events), vec!["Player attacks Orc for 4 hit points."]);
        assert_eq!(state.actor(orc).unwrap().fighter.hp(), 6);

        BumpAction {
            actor: player,
            direction: Direction::South,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(state.player_position(), Some(Position::new(5, 6)));
    }

    #[test]
    fn test_melee_damage_never_negative() {
        let mut state = arena();
        let player = state.player_id;
        let troll = state.map.add_entity(ActorKind::Troll.spawn(Position::new(6, 5)));
        state.actor_mut(troll).unwrap().fighter.base_defense = 5;

        let events = MeleeAction {
            actor: player,
            direction: Direction::East,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(texts(&events), vec!["Player attacks Troll but does no damage."]);
        assert_eq!(state.actor(troll).unwrap().fighter.hp(), 16);
    }

    #[test]
    fn test_melee_against_empty_tile_fails() {
        let mut state = arena();
        let action = MeleeAction {
            actor: state.player_id,
            direction: Direction::North,
        };
        assert_eq!(
            action.execute(&mut state).unwrap_err().to_string(),
            "Nothing to attack."
        );
    }

    #[test]
    fn test_killing_blow_logs_attack_then_death() {
        let mut state = arena();
        let player = state.player_id;
        let orc = state.map.add_entity(ActorKind::Orc.spawn(Position::new(6, 5)));
        state.actor_mut(orc).unwrap().fighter.set_hp(3);

        let events = MeleeAction {
            actor: player,
            direction: Direction::East,
        }
        .execute(&mut state)
        .unwrap();
        let lines = texts(&events);
        assert_eq!(lines[0], "Player attacks Orc for 4 hit points.");
        assert_eq!(lines[1], "Orc is dead!");
        assert!(!state.entity(orc).unwrap().blocks_movement);
    }

    #[test]
    fn test_pickup_and_drop() {
        let mut state = arena();
        let player = state.player_id;
        let pickup = PickupAction { actor: player };

        assert_eq!(
            pickup.execute(&mut state).unwrap_err().to_string(),
            "There is nothing here to pick up."
        );

        let potion = state
            .map
            .add_entity(ItemKind::HealthPotion.spawn(Position::new(5, 5)));
        let events = pickup.execute(&mut state).unwrap();
        assert_eq!(texts(&events), vec!["You picked up the Health Potion!"]);
        assert!(state.map.entity(potion).is_none());
        assert!(state.player_actor().unwrap().inventory.get(potion).is_some());

        DropAction {
            actor: player,
            item: potion,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(state.map.entity(potion).unwrap().position, Position::new(5, 5));
        assert!(state.player_actor().unwrap().inventory.get(potion).is_none());
    }

    #[test]
    fn test_pickup_with_full_inventory_fails() {
        let mut state = arena();
        let player = state.player_id;
        state.player_actor_mut().unwrap().inventory.capacity = 2;
        let potion = state
            .map
            .add_entity(ItemKind::HealthPotion.spawn(Position::new(5, 5)));

        let err = PickupAction { actor: player }.execute(&mut state).unwrap_err();
        assert_eq!(err.to_string(), "Your inventory is full.");
        assert!(state.map.entity(potion).is_some());
        assert_eq!(state.player_actor().unwrap().inventory.len(), 2);
    }

    #[test]
    fn test_dropping_worn_item_unequips_it() {
        let mut state = arena();
        let player = state.player_id;
        let dagger = player_item(&state, ItemKind::Dagger);

        let events = DropAction {
            actor: player,
            item: dagger,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(
            texts(&events),
            vec!["You remove the Dagger.", "You dropped the Dagger."]
        );
        let actor = state.player_actor().unwrap();
        assert!(!actor.equipment.is_equipped(dagger));
        assert_eq!(actor.power(), 2);
    }

    #[test]
    fn test_equip_toggles_and_replaces() {
        let mut state = arena();
        let player = state.player_id;
        let dagger = player_item(&state, ItemKind::Dagger);
        let sword = ItemKind::Sword.spawn(Position::new(5, 5));
        let sword_id = sword.id;
        state.player_actor_mut().unwrap().inventory.items.push(sword);

        let events = EquipAction {
            actor: player,
            item: sword_id,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(texts(&events), vec!["You remove the Dagger.", "You equip the Sword."]);
        let actor = state.player_actor().unwrap();
        assert!(actor.equipment.is_equipped(sword_id));
        assert!(!actor.equipment.is_equipped(dagger));
        assert_eq!(actor.power(), 6);

        let events = EquipAction {
            actor: player,
            item: sword_id,
        }
        .execute(&mut state)
        .unwrap();
        assert_eq!(texts(&events), vec!["You remove the Sword."]);
        assert_eq!(state.player_actor().unwrap().power(), 2);
    }

    #[test]
    fn test_equipping_a_potion_fails() {
        let mut state = arena();
        let potion = ItemKind::HealthPotion.spawn(Position::new(5, 5));
        let potion_id = potion.id;
        state.player_actor_mut().unwrap().inventory.items.push(potion);

        let err = EquipAction {
            actor: state.player_id,
            item: potion_id,
        }
        .execute(&mut state)
        .unwrap_err();
        assert_eq!(err.to_string(), "The Health Potion cannot be equipped.");
    }

    #[test]
    fn test_using_armor_fails() {
        let mut state = arena();
        let armor = player_item(&state, ItemKind::LeatherArmor);
        let err = ItemAction {
            actor: state.player_id,
            item: armor,
            target: None,
        }
        .execute(&mut state)
        .unwrap_err();
        assert_eq!(err.to_string(), "The Leather Armor cannot be used.");
    }

    #[test]
    fn test_stairs_only_from_stairs_tile() {
        let mut state = arena();
        let player = state.player_id;
        let err = TakeStairsAction { actor: player }
            .execute(&mut state)
            .unwrap_err();
        assert_eq!(err.to_string(), "There are no stairs here.");

        state.map.set_tile(Position::new(5, 5), Tile::down_stairs()).unwrap();
        let events = TakeStairsAction { actor: player }
            .execute(&mut state)
            .unwrap();
        assert!(events.contains(&GameEvent::FloorChanged { floor: 2 }));
        assert_eq!(state.current_floor, 2);
        assert_eq!(state.map.entities[0].id, player);
        assert!(state.map.is_visible(state.player_position().unwrap()));
    }
}
