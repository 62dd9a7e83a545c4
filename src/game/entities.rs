//! # Entities
//!
//! Positioned game objects. Every entity is either an [`Actor`] or an [`Item`];
//! which one is carried in [`EntityKind`] and matched exhaustively.
//!
//! Ownership is structural: an entity lives either in a map's entity list or
//! inside exactly one actor's inventory, never both.

use crate::components::{Consumable, Equipment, Equippable, Fighter, Inventory, Level};
use crate::rendering::Rgb;
use crate::{Ai, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Draw priority when several entities share a tile; later variants draw on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Stable identifier for each kind of actor, used by spawn tables and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Player,
    Orc,
    Troll,
}

/// Stable identifier for each kind of item, used by spawn tables and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    HealthPotion,
    LightningScroll,
    ConfusionScroll,
    FireballScroll,
    Dagger,
    Sword,
    LeatherArmor,
    ChainMail,
}

/// A creature with combat stats that takes turns.
///
/// `ai` is `None` for the player and for the dead.
#[derive(Debug, Clone)]
pub struct Actor {
    pub kind: ActorKind,
    pub ai: Option<Ai>,
    pub fighter: Fighter,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub level: Level,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        self.fighter.hp() > 0
    }

    pub fn power(&self) -> i32 {
        self.fighter.power(&self.equipment)
    }

    pub fn defense(&self) -> i32 {
        self.fighter.defense(&self.equipment)
    }

    /// Raises max hp and current hp by `amount`, spending a level.
    pub fn increase_max_hp(&mut self, amount: i32) {
        self.fighter.max_hp += amount;
        let hp = self.fighter.hp();
        self.fighter.set_hp(hp + amount);
        self.level.increase_level();
    }

    /// Raises base power by `amount`, spending a level.
    pub fn increase_power(&mut self, amount: i32) {
        self.fighter.base_power += amount;
        self.level.increase_level();
    }

    /// Raises base defense by `amount`, spending a level.
    pub fn increase_defense(&mut self, amount: i32) {
        self.fighter.base_defense += amount;
        self.level.increase_level();
    }
}

/// Something that can be picked up, used or worn.
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub consumable: Option<Consumable>,
    pub equippable: Option<Equippable>,
}

/// Actor or item payload of an entity.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Actor(Actor),
    Item(Item),
}

/// A positioned object on the map or in an inventory.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub ch: char,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
    pub name: String,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    pub kind: EntityKind,
}

impl Entity {
    pub fn as_actor(&self) -> Option<&Actor> {
        match &self.kind {
            EntityKind::Actor(actor) => Some(actor),
            EntityKind::Item(_) => None,
        }
    }

    pub fn as_actor_mut(&mut self) -> Option<&mut Actor> {
        match &mut self.kind {
            EntityKind::Actor(actor) => Some(actor),
            EntityKind::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            EntityKind::Actor(_) => None,
        }
    }

    /// True for actors that still have hp left.
    pub fn is_alive_actor(&self) -> bool {
        self.as_actor().map(Actor::is_alive).unwrap_or(false)
    }

    /// Euclidean distance to a position.
    pub fn distance(&self, pos: Position) -> f64 {
        self.position.euclidean_distance(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_order_ranks_actors_over_items_over_corpses() {
        assert!(RenderOrder::Corpse < RenderOrder::Item);
        assert!(RenderOrder::Item < RenderOrder::Actor);
    }

    #[test]
    fn test_kind_accessors() {
        let orc = ActorKind::Orc.spawn(Position::new(1, 1));
        assert!(orc.as_actor().is_some());
        assert!(orc.as_item().is_none());
        assert!(orc.is_alive_actor());

        let potion = ItemKind::HealthPotion.spawn(Position::new(1, 1));
        assert!(potion.as_item().is_some());
        assert!(!potion.is_alive_actor());
    }

    #[test]
    fn test_kind_identifiers_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&ItemKind::LeatherArmor).unwrap(),
            "\"leather_armor\""
        );
        assert_eq!(serde_json::to_string(&ActorKind::Troll).unwrap(), "\"troll\"");
    }
}
