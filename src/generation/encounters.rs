//! # Encounter Generation
//!
//! Actor templates (the player and the monsters) and the depth-scaled tables
//! that decide which monsters a room receives.

use crate::components::{Equipment, Fighter, Inventory, Level};
use crate::rendering::{palette, Rgb};
use crate::{
    choose_for_floor, config, max_value_for_floor, new_entity_id, Actor, ActorKind, Ai, Entity,
    EntityKind, FloorValues, GenerationConfig, Generator, ItemKind, Position, RenderOrder,
    RogueError, RogueResult, SpawnTable,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Most monsters a room can hold, by floor.
pub const MAX_MONSTERS_BY_FLOOR: FloorValues = &[(1, 2), (4, 3), (6, 5)];

/// Monster weights by floor.
pub const ENEMY_CHANCES: SpawnTable<ActorKind> = &[
    (0, &[(ActorKind::Orc, 80)]),
    (3, &[(ActorKind::Troll, 15)]),
    (5, &[(ActorKind::Troll, 30)]),
    (7, &[(ActorKind::Troll, 60)]),
];

impl ActorKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ActorKind::Player => "Player",
            ActorKind::Orc => "Orc",
            ActorKind::Troll => "Troll",
        }
    }

    /// Builds a fresh actor of this kind standing at `position`.
    ///
    /// The player starts with a dagger and leather armor, both worn.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{ActorKind, Position};
    ///
    /// let player = ActorKind::Player.spawn(Position::new(1, 1));
    /// let actor = player.as_actor().unwrap();
    /// assert_eq!(actor.fighter.hp(), 30);
    /// assert_eq!(actor.power(), 4);
    /// assert_eq!(actor.defense(), 2);
    /// assert!(actor.ai.is_none());
    /// ```
    pub fn spawn(self, position: Position) -> Entity {
        let (ch, fg, fighter, level, capacity) = match self {
            ActorKind::Player => (
                '@',
                palette::WHITE,
                Fighter::new(30, 1, 2),
                Level::new(200, 150, 0),
                config::INVENTORY_CAPACITY,
            ),
            ActorKind::Orc => (
                'o',
                Rgb(63, 127, 63),
                Fighter::new(10, 0, 3),
                Level::new(0, 150, 35),
                0,
            ),
            ActorKind::Troll => (
                'T',
                Rgb(0, 127, 0),
                Fighter::new(16, 1, 4),
                Level::new(0, 150, 100),
                0,
            ),
        };

        let mut actor = Actor {
            kind: self,
            ai: match self {
                ActorKind::Player => None,
                ActorKind::Orc | ActorKind::Troll => Some(Ai::hostile()),
            },
            fighter,
            inventory: Inventory::new(capacity),
            equipment: Equipment::default(),
            level,
        };

        if self == ActorKind::Player {
            for kind in [ItemKind::Dagger, ItemKind::LeatherArmor] {
                give_equipped(&mut actor, kind.spawn(position));
            }
        }

        Entity {
            id: new_entity_id(),
            position,
            ch,
            fg,
            bg: None,
            name: self.display_name().to_string(),
            blocks_movement: true,
            render_order: RenderOrder::Actor,
            kind: EntityKind::Actor(actor),
        }
    }
}

fn give_equipped(actor: &mut Actor, item: Entity) {
    if let Some(equippable) = item.as_item().and_then(|item| item.equippable) {
        actor.equipment.equip(item.id, equippable);
    }
    actor.inventory.items.push(item);
}

/// Rolls the monsters for one room.
pub struct EncounterGenerator;

impl Generator<Vec<ActorKind>> for EncounterGenerator {
    fn generate(
        &self,
        _config: &GenerationConfig,
        floor: u32,
        rng: &mut StdRng,
    ) -> RogueResult<Vec<ActorKind>> {
        let count = rng.gen_range(0..=max_value_for_floor(MAX_MONSTERS_BY_FLOOR, floor));
        Ok(choose_for_floor(ENEMY_CHANCES, count, floor, rng))
    }

    fn validate(
        &self,
        content: &Vec<ActorKind>,
        _config: &GenerationConfig,
        floor: u32,
    ) -> RogueResult<()> {
        if content.contains(&ActorKind::Player) {
            return Err(RogueError::GenerationFailed(
                "Encounter tables must not spawn a player".to_string(),
            ));
        }
        let limit = max_value_for_floor(MAX_MONSTERS_BY_FLOOR, floor) as usize;
        if content.len() > limit {
            return Err(RogueError::GenerationFailed(format!(
                "{} monsters rolled for one room on floor {} (at most {})",
                content.len(),
                floor,
                limit
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monster_stats() {
        let orc = ActorKind::Orc.spawn(Position::new(0, 0));
        let actor = orc.as_actor().unwrap();
        assert_eq!((orc.ch, orc.name.as_str()), ('o', "Orc"));
        assert_eq!(actor.fighter.max_hp, 10);
        assert_eq!((actor.defense(), actor.power()), (0, 3));
        assert_eq!(actor.level.xp_given, 35);
        assert!(actor.ai.is_some());
        assert!(orc.blocks_movement);

        let troll = ActorKind::Troll.spawn(Position::new(0, 0));
        let actor = troll.as_actor().unwrap();
        assert_eq!(actor.fighter.max_hp, 16);
        assert_eq!((actor.defense(), actor.power()), (1, 4));
        assert_eq!(actor.level.xp_given, 100);
    }

    #[test]
    fn test_player_starting_gear() {
        let player = ActorKind::Player.spawn(Position::new(0, 0));
        let actor = player.as_actor().unwrap();
        assert_eq!(actor.inventory.len(), 2);
        assert_eq!(actor.inventory.capacity, 26);
        for item in &actor.inventory.items {
            assert!(actor.equipment.is_equipped(item.id));
        }
        assert_eq!(actor.level.experience_to_next_level(), 350);
    }

    #[test]
    fn test_trolls_appear_deeper() {
        let config = GenerationConfig::new(11);
        let mut rng = config.floor_rng(1);
        for _ in 0..50 {
            let shallow = EncounterGenerator.generate(&config, 1, &mut rng).unwrap();
            assert!(shallow.len() <= 2);
            assert!(shallow.iter().all(|kind| *kind == ActorKind::Orc));
        }

        let mut saw_troll = false;
        for _ in 0..200 {
            let deep = EncounterGenerator.generate(&config, 8, &mut rng).unwrap();
            assert!(deep.len() <= 5);
            assert!(EncounterGenerator.validate(&deep, &config, 8).is_ok());
            saw_troll |= deep.contains(&ActorKind::Troll);
        }
        assert!(saw_troll);
    }

    #[test]
    fn test_crowded_room_fails_validation() {
        let config = GenerationConfig::new(11);
        let crowd = vec![ActorKind::Orc; 3];
        assert!(matches!(
            EncounterGenerator.validate(&crowd, &config, 1),
            Err(RogueError::GenerationFailed(_))
        ));
        assert!(EncounterGenerator.validate(&crowd, &config, 4).is_ok());
        assert!(EncounterGenerator
            .validate(&vec![ActorKind::Player], &config, 8)
            .is_err());
    }
}
