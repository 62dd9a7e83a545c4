//! # Actor Components
//!
//! The behavior pieces an [`Actor`](crate::Actor) is built from: combat stats,
//! carried items, worn equipment and experience.

use crate::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Hit points and base combat stats.
///
/// `hp` is private so every write goes through the clamp to `[0, max_hp]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    pub max_hp: i32,
    hp: i32,
    pub base_defense: i32,
    pub base_power: i32,
}

impl Fighter {
    /// Creates a fighter at full health.
    pub fn new(hp: i32, base_defense: i32, base_power: i32) -> Self {
        let max_hp = hp.max(0);
        Self {
            max_hp,
            hp: max_hp,
            base_defense,
            base_power,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Sets hp, clamped to `[0, max_hp]`.
    ///
    /// Returns true when this write took hp from above zero to exactly zero;
    /// the caller runs the death transition on that signal only.
    pub fn set_hp(&mut self, value: i32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = value.clamp(0, self.max_hp.max(0));
        was_alive && self.hp == 0
    }

    /// Restores up to `amount` hp and returns how much was actually restored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rogue::Fighter;
    ///
    /// let mut fighter = Fighter::new(30, 1, 2);
    /// fighter.set_hp(28);
    /// assert_eq!(fighter.heal(4), 2);
    /// assert_eq!(fighter.hp(), 30);
    /// assert_eq!(fighter.heal(4), 0);
    /// ```
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp >= self.max_hp || amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }

    /// Lowers hp by `amount`. Returns true if this blow was the killing one.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.set_hp(self.hp - amount.max(0))
    }

    /// Base power plus equipment bonuses.
    pub fn power(&self, equipment: &Equipment) -> i32 {
        self.base_power + equipment.power_bonus()
    }

    /// Base defense plus equipment bonuses.
    pub fn defense(&self, equipment: &Equipment) -> i32 {
        self.base_defense + equipment.defense_bonus()
    }
}

/// Ordered list of carried items with a fixed capacity.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Takes an item out of the inventory.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

/// Which equipment slot an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

/// Bonuses an item grants while worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equippable {
    pub slot: EquipmentSlot,
    pub power_bonus: i32,
    pub defense_bonus: i32,
}

/// An inventory item currently worn in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquippedItem {
    pub item: EntityId,
    pub equippable: Equippable,
}

/// The two equipment slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Equipment {
    pub weapon: Option<EquippedItem>,
    pub armor: Option<EquippedItem>,
}

impl Equipment {
    pub fn power_bonus(&self) -> i32 {
        self.occupied().map(|worn| worn.equippable.power_bonus).sum()
    }

    pub fn defense_bonus(&self) -> i32 {
        self.occupied().map(|worn| worn.equippable.defense_bonus).sum()
    }

    fn occupied(&self) -> impl Iterator<Item = &EquippedItem> {
        self.weapon.iter().chain(self.armor.iter())
    }

    pub fn slot(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        }
    }

    pub fn is_equipped(&self, item: EntityId) -> bool {
        self.occupied().any(|worn| worn.item == item)
    }

    /// Puts an item in its slot, returning whatever was there before.
    pub fn equip(&mut self, item: EntityId, equippable: Equippable) -> Option<EquippedItem> {
        self.slot_mut(equippable.slot)
            .replace(EquippedItem { item, equippable })
    }

    /// Empties the slot holding `item`, if any.
    pub fn unequip(&mut self, item: EntityId) -> Option<EquippedItem> {
        for slot in [EquipmentSlot::Weapon, EquipmentSlot::Armor] {
            let held = self.slot_mut(slot);
            if held.map(|worn| worn.item == item).unwrap_or(false) {
                return held.take();
            }
        }
        None
    }
}

/// Experience and character level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub current_level: i32,
    pub current_xp: i32,
    pub level_up_base: i32,
    pub level_up_factor: i32,
    /// Experience awarded to the player for killing this actor
    pub xp_given: i32,
}

impl Level {
    pub fn new(level_up_base: i32, level_up_factor: i32, xp_given: i32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor,
            xp_given,
        }
    }

    /// `level_up_base + current_level * level_up_factor`.
    pub fn experience_to_next_level(&self) -> i32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.current_xp > self.experience_to_next_level()
    }

    /// Banks experience. Returns true if a level-up is now pending.
    pub fn add_xp(&mut self, xp: i32) -> bool {
        if xp <= 0 {
            return false;
        }
        self.current_xp += xp;
        self.requires_level_up()
    }

    /// Spends one level's worth of experience; leftover XP carries over.
    pub fn increase_level(&mut self) {
        self.current_xp -= self.experience_to_next_level();
        self.current_level += 1;
    }
}

/// The attribute a player raises when leveling up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelUpChoice {
    /// +20 max hp
    Constitution,
    /// +1 power
    Strength,
    /// +1 defense
    Agility,
}

/// Single-use item effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consumable {
    Healing { amount: i32 },
    Lightning { damage: i32, maximum_range: f64 },
    Confusion { number_of_turns: u32 },
    Fireball { damage: i32, radius: f64 },
}

/// What the player has to pick before a consumable can be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetRequirement {
    None,
    Single,
    Area { radius: f64 },
}

impl Consumable {
    pub fn target_requirement(&self) -> TargetRequirement {
        match self {
            Consumable::Healing { .. } | Consumable::Lightning { .. } => TargetRequirement::None,
            Consumable::Confusion { .. } => TargetRequirement::Single,
            Consumable::Fireball { radius, .. } => TargetRequirement::Area { radius: *radius },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_hp_is_clamped() {
        let mut fighter = Fighter::new(10, 0, 3);
        fighter.set_hp(50);
        assert_eq!(fighter.hp(), 10);
        fighter.set_hp(-5);
        assert_eq!(fighter.hp(), 0);
    }

    #[test]
    fn test_heal_returns_delta() {
        let mut fighter = Fighter::new(30, 1, 2);
        fighter.set_hp(28);
        assert_eq!(fighter.heal(4), 2);
        assert_eq!(fighter.hp(), 30);
        assert_eq!(fighter.heal(4), 0);

        fighter.set_hp(10);
        assert_eq!(fighter.heal(4), 4);
        assert_eq!(fighter.hp(), 14);
    }

    #[test]
    fn test_killing_blow_fires_once() {
        let mut fighter = Fighter::new(10, 0, 3);
        assert!(!fighter.take_damage(4));
        assert!(fighter.take_damage(20));
        assert_eq!(fighter.hp(), 0);
        assert!(!fighter.take_damage(5), "death signal must not repeat");
        assert!(!fighter.set_hp(0));
    }

    #[test]
    fn test_derived_stats_include_equipment() {
        let fighter = Fighter::new(30, 1, 2);
        let mut equipment = Equipment::default();
        assert_eq!(fighter.power(&equipment), 2);

        let sword = crate::new_entity_id();
        equipment.equip(
            sword,
            Equippable {
                slot: EquipmentSlot::Weapon,
                power_bonus: 4,
                defense_bonus: 0,
            },
        );
        let mail = crate::new_entity_id();
        equipment.equip(
            mail,
            Equippable {
                slot: EquipmentSlot::Armor,
                power_bonus: 0,
                defense_bonus: 3,
            },
        );

        assert_eq!(fighter.power(&equipment), 6);
        assert_eq!(fighter.defense(&equipment), 4);
        assert!(equipment.is_equipped(sword));

        let removed = equipment.unequip(sword).unwrap();
        assert_eq!(removed.item, sword);
        assert_eq!(fighter.power(&equipment), 2);
        assert!(equipment.unequip(sword).is_none());
    }

    #[test]
    fn test_equip_replaces_occupant() {
        let mut equipment = Equipment::default();
        let weapon = Equippable {
            slot: EquipmentSlot::Weapon,
            power_bonus: 2,
            defense_bonus: 0,
        };
        let dagger = crate::new_entity_id();
        let sword = crate::new_entity_id();

        assert!(equipment.equip(dagger, weapon).is_none());
        let previous = equipment.equip(sword, weapon).unwrap();
        assert_eq!(previous.item, dagger);
        assert_eq!(equipment.slot(EquipmentSlot::Weapon).unwrap().item, sword);
    }

    #[test]
    fn test_level_up_consumes_threshold() {
        let mut level = Level {
            current_level: 1,
            current_xp: 250,
            level_up_base: 0,
            level_up_factor: 200,
            xp_given: 0,
        };
        assert_eq!(level.experience_to_next_level(), 200);
        assert!(level.requires_level_up());

        level.increase_level();
        assert_eq!(level.current_xp, 50);
        assert_eq!(level.current_level, 2);
        assert!(!level.requires_level_up());
    }

    #[test]
    fn test_add_xp_reports_pending_level() {
        let mut level = Level::new(200, 150, 0);
        assert!(!level.add_xp(100));
        assert!(level.add_xp(300));
        assert!(!level.add_xp(0));
        assert_eq!(level.current_xp, 400);
    }

    #[test]
    fn test_inventory_capacity() {
        let mut inventory = Inventory::new(1);
        assert!(!inventory.is_full());
        inventory
            .items
            .push(crate::ItemKind::HealthPotion.spawn(crate::Position::new(0, 0)));
        assert!(inventory.is_full());
    }
}
