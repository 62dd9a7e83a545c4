//! # Item Generation
//!
//! Item templates and the depth-scaled tables that decide which items a room
//! receives.

use crate::components::{Consumable, EquipmentSlot, Equippable};
use crate::rendering::Rgb;
use crate::{
    choose_for_floor, max_value_for_floor, new_entity_id, Entity, EntityKind, FloorValues,
    GenerationConfig, Generator, Item, ItemKind, Position, RenderOrder, RogueError, RogueResult,
    SpawnTable,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Most items a room can hold, by floor.
pub const MAX_ITEMS_BY_FLOOR: FloorValues = &[(1, 1), (4, 2)];

/// Item weights by floor.
pub const ITEM_CHANCES: SpawnTable<ItemKind> = &[
    (0, &[(ItemKind::HealthPotion, 35)]),
    (2, &[(ItemKind::ConfusionScroll, 10)]),
    (4, &[(ItemKind::LightningScroll, 25), (ItemKind::Sword, 5)]),
    (6, &[(ItemKind::FireballScroll, 25), (ItemKind::ChainMail, 15)]),
];

impl ItemKind {
    /// Every item kind, in table order.
    pub const ALL: [ItemKind; 8] = [
        ItemKind::HealthPotion,
        ItemKind::LightningScroll,
        ItemKind::ConfusionScroll,
        ItemKind::FireballScroll,
        ItemKind::Dagger,
        ItemKind::Sword,
        ItemKind::LeatherArmor,
        ItemKind::ChainMail,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::LightningScroll => "Lightning Scroll",
            ItemKind::ConfusionScroll => "Confusion Scroll",
            ItemKind::FireballScroll => "Fireball Scroll",
            ItemKind::Dagger => "Dagger",
            ItemKind::Sword => "Sword",
            ItemKind::LeatherArmor => "Leather Armor",
            ItemKind::ChainMail => "Chain Mail",
        }
    }

    /// Builds a fresh item of this kind lying at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::{ItemKind, Position};
    ///
    /// let sword = ItemKind::Sword.spawn(Position::new(3, 4));
    /// assert_eq!(sword.name, "Sword");
    /// assert_eq!(sword.as_item().unwrap().equippable.unwrap().power_bonus, 4);
    /// assert!(!sword.blocks_movement);
    /// ```
    pub fn spawn(self, position: Position) -> Entity {
        let (ch, fg, consumable, equippable) = match self {
            ItemKind::HealthPotion => (
                '!',
                Rgb(127, 0, 255),
                Some(Consumable::Healing { amount: 4 }),
                None,
            ),
            ItemKind::LightningScroll => (
                '~',
                Rgb(255, 255, 0),
                Some(Consumable::Lightning {
                    damage: 20,
                    maximum_range: 5.0,
                }),
                None,
            ),
            ItemKind::ConfusionScroll => (
                '~',
                Rgb(207, 63, 255),
                Some(Consumable::Confusion { number_of_turns: 10 }),
                None,
            ),
            ItemKind::FireballScroll => (
                '~',
                Rgb(255, 0, 0),
                Some(Consumable::Fireball {
                    damage: 12,
                    radius: 3.0,
                }),
                None,
            ),
            ItemKind::Dagger => ('/', Rgb(0, 191, 255), None, Some(weapon(2))),
            ItemKind::Sword => ('/', Rgb(0, 191, 255), None, Some(weapon(4))),
            ItemKind::LeatherArmor => ('[', Rgb(139, 69, 19), None, Some(armor(1))),
            ItemKind::ChainMail => ('[', Rgb(139, 69, 19), None, Some(armor(3))),
        };

        Entity {
            id: new_entity_id(),
            position,
            ch,
            fg,
            bg: None,
            name: self.display_name().to_string(),
            blocks_movement: false,
            render_order: RenderOrder::Item,
            kind: EntityKind::Item(Item {
                kind: self,
                consumable,
                equippable,
            }),
        }
    }
}

fn weapon(power_bonus: i32) -> Equippable {
    Equippable {
        slot: EquipmentSlot::Weapon,
        power_bonus,
        defense_bonus: 0,
    }
}

fn armor(defense_bonus: i32) -> Equippable {
    Equippable {
        slot: EquipmentSlot::Armor,
        power_bonus: 0,
        defense_bonus,
    }
}

/// Rolls the items for one room.
pub struct ItemGenerator;

impl Generator<Vec<ItemKind>> for ItemGenerator {
    fn generate(
        &self,
        _config: &GenerationConfig,
        floor: u32,
        rng: &mut StdRng,
    ) -> RogueResult<Vec<ItemKind>> {
        let count = rng.gen_range(0..=max_value_for_floor(MAX_ITEMS_BY_FLOOR, floor));
        Ok(choose_for_floor(ITEM_CHANCES, count, floor, rng))
    }

    fn validate(
        &self,
        content: &Vec<ItemKind>,
        _config: &GenerationConfig,
        floor: u32,
    ) -> RogueResult<()> {
        let limit = max_value_for_floor(MAX_ITEMS_BY_FLOOR, floor) as usize;
        if content.len() > limit {
            return Err(RogueError::GenerationFailed(format!(
                "{} items rolled for one room on floor {} (at most {})",
                content.len(),
                floor,
                limit
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}
