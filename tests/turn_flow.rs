//! Integration tests for the turn scheduler, combat, inventory and AI.

use rogue::{
    take_turn, ActorKind, Ai, BumpAction, ConcreteAction, Direction, EntityId, Fighter,
    GameMap, GameState, GenerationConfig, ItemKind, Level, PickupAction, Position, Tile,
    WaitAction,
};

/// A walled 12x12 room with the player at (5, 5).
fn arena() -> GameState {
    let mut map = GameMap::new(12, 12);
    for y in 1..11 {
        for x in 1..11 {
            map.set_tile(Position::new(x, y), Tile::floor()).unwrap();
        }
    }
    let player_id = map.add_entity(ActorKind::Player.spawn(Position::new(5, 5)));
    GameState::from_parts(map, player_id, 1, GenerationConfig::for_testing(42))
}

fn spawn(state: &mut GameState, kind: ActorKind, at: Position) -> EntityId {
    let id = state.map.add_entity(kind.spawn(at));
    state.update_fov();
    id
}

fn last_texts(state: &GameState) -> Vec<String> {
    state
        .messages
        .messages()
        .iter()
        .map(|message| message.text.clone())
        .collect()
}

#[test]
fn test_attack_weaker_than_defense_does_no_damage() {
    let mut state = arena();
    let orc = spawn(&mut state, ActorKind::Orc, Position::new(6, 5));
    state.actor_mut(orc).unwrap().fighter.base_defense = 5;

    let player = state.actor_mut(state.player_id).unwrap();
    player.fighter.base_power = 3 - player.equipment.power_bonus();
    assert_eq!(state.player_actor().unwrap().power(), 3);

    let acted = state
        .process_player_action(ConcreteAction::Bump(BumpAction {
            actor: state.player_id,
            direction: Direction::East,
        }))
        .unwrap();

    assert!(acted);
    assert_eq!(state.actor(orc).unwrap().fighter.hp(), 10);
    assert!(last_texts(&state).contains(&"Player attacks Orc but does no damage.".to_string()));
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_impossible_action_costs_nothing() {
    let mut state = arena();
    let orc = spawn(&mut state, ActorKind::Orc, Position::new(8, 8));
    let player_id = state.player_id;
    state.map.entity_mut(player_id).unwrap().position = Position::new(1, 1);
    state.update_fov();

    let acted = state
        .process_player_action(ConcreteAction::Bump(BumpAction {
            actor: player_id,
            direction: Direction::Northwest,
        }))
        .unwrap();

    assert!(!acted);
    assert_eq!(state.turn_number, 0);
    assert_eq!(state.entity(orc).unwrap().position, Position::new(8, 8));
    assert_eq!(state.messages.last().unwrap().text, "That way is blocked.");
}

#[test]
fn test_pickup_refused_at_capacity() {
    let mut state = arena();
    let player_id = state.player_id;
    {
        let player = state.player_actor_mut().unwrap();
        while !player.inventory.is_full() {
            player
                .inventory
                .items
                .push(ItemKind::HealthPotion.spawn(Position::new(0, 0)));
        }
        assert_eq!(player.inventory.len(), 26);
    }
    let scroll = state
        .map
        .add_entity(ItemKind::LightningScroll.spawn(Position::new(5, 5)));

    let acted = state
        .process_player_action(ConcreteAction::Pickup(PickupAction { actor: player_id }))
        .unwrap();

    assert!(!acted);
    assert_eq!(state.messages.last().unwrap().text, "Your inventory is full.");
    assert!(state.map.entity(scroll).is_some());
    assert_eq!(state.player_actor().unwrap().inventory.len(), 26);
}

#[test]
fn test_pickup_moves_item_into_inventory() {
    let mut state = arena();
    let player_id = state.player_id;
    let scroll = state
        .map
        .add_entity(ItemKind::LightningScroll.spawn(Position::new(5, 5)));

    assert!(state
        .process_player_action(ConcreteAction::Pickup(PickupAction { actor: player_id }))
        .unwrap());
    assert!(state.map.entity(scroll).is_none());
    assert!(state.player_actor().unwrap().inventory.get(scroll).is_some());
    assert_eq!(
        state.messages.last().unwrap().text,
        "You picked up the Lightning Scroll!"
    );
}

#[test]
fn test_confused_monster_stumbles_once_then_recovers() {
    let mut state = arena();
    let orc = spawn(&mut state, ActorKind::Orc, Position::new(5, 8));
    state.actor_mut(orc).unwrap().ai = Some(Ai::confused(Ai::hostile(), 1));

    let start = state.entity(orc).unwrap().position;
    take_turn(&mut state, orc).unwrap();
    let moved_to = state.entity(orc).unwrap().position;
    assert_eq!(start.chebyshev_distance(moved_to), 1);
    assert_eq!(state.actor(orc).unwrap().ai.as_ref().unwrap().confused_turns_remaining(), 0);

    take_turn(&mut state, orc).unwrap();
    assert_eq!(state.entity(orc).unwrap().position, moved_to);
    assert_eq!(state.actor(orc).unwrap().ai, Some(Ai::hostile()));
}

#[test]
fn test_level_threshold_and_carry_over() {
    let mut level = Level::new(0, 200, 0);
    assert_eq!(level.experience_to_next_level(), 200);
    assert!(level.add_xp(250));
    assert!(level.requires_level_up());
    level.increase_level();
    assert_eq!(level.current_level, 2);
    assert_eq!(level.current_xp, 50);
    assert!(!level.requires_level_up());
}

#[test]
fn test_heal_reports_restored_amount() {
    let mut fighter = Fighter::new(30, 0, 0);
    fighter.set_hp(28);
    assert_eq!(fighter.heal(4), 2);
    assert_eq!(fighter.hp(), 30);
    assert_eq!(fighter.heal(4), 0);
}

#[test]
fn test_seen_tiles_stay_seen_after_moving_away() {
    let mut state = arena();
    let corner = Position::new(1, 1);
    assert!(state.map.tile(corner).unwrap().is_visible());

    let player_id = state.player_id;
    state.map.entity_mut(player_id).unwrap().position = Position::new(10, 10);
    state.map.tiles[10][9] = Tile::wall();
    state.map.tiles[9][10] = Tile::wall();
    state.map.tiles[9][9] = Tile::wall();
    state.update_fov();

    let tile = state.map.tile(corner).unwrap();
    assert!(!tile.is_visible());
    assert!(tile.is_seen());
}

#[test]
fn test_dead_player_cannot_act() {
    let mut state = arena();
    let troll = spawn(&mut state, ActorKind::Troll, Position::new(6, 6));
    state.actor_mut(troll).unwrap().fighter.base_power = 100;
    let player_id = state.player_id;

    assert!(state
        .process_player_action(ConcreteAction::Wait(WaitAction { actor: player_id }))
        .unwrap());
    assert!(!state.is_player_alive());
    assert!(state.is_game_over());
    assert_eq!(state.player().unwrap().name, "Remains of Player");

    let turn = state.turn_number;
    assert!(!state
        .process_player_action(ConcreteAction::Wait(WaitAction { actor: player_id }))
        .unwrap());
    assert_eq!(state.turn_number, turn);
}
