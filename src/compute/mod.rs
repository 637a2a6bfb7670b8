//! Level simulation.
//!
//! `tick` takes an immutable reference to the current `LevelState` (plus the
//! held keys and an RNG handle) and returns a brand-new `LevelState`. Side
//! effects are limited to the injected RNG, so a seeded RNG makes a run
//! fully deterministic.

pub mod ai;
pub mod collision;
pub mod input;
pub mod movement;
pub mod spawn;
pub mod weapon;

use std::rc::Rc;

use log::{debug, info, trace};
use rand::Rng;

use crate::entities::{Entity, LevelResult, LevelState, PlayerView};
use crate::error::GameError;
use crate::levels::LevelRecord;
use crate::map::MapData;
use crate::physics::Physics;

use self::input::InputState;
use self::movement::{update_entity, Fate};

/// Ticks the result banner stays up before returning to the menu
/// (one second at 60 FPS).
pub const SWITCH_TO_MENU_DELAY: u64 = 60;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state for a level on an already loaded map.
///
/// Physics are scaled to the map once, then every entity gets its own copy.
pub fn init_level(
    record: &LevelRecord,
    map: Rc<MapData>,
    rng: &mut impl Rng,
) -> Result<LevelState, GameError> {
    let physics = Physics::scaled(map.width, map.height);

    let player = spawn::spawn_player(&record.player, &map, physics.clone(), rng)?;
    let enemies = record
        .enemies
        .iter()
        .map(|e| spawn::spawn_enemy(e, &map, physics.clone(), rng))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "level {} \"{}\": {} enemies on a {}x{} field",
        record.id,
        record.name,
        enemies.len(),
        map.width,
        map.height
    );

    let player_view = view_of(&player);
    Ok(LevelState {
        level_id: record.id,
        level_name: record.name.clone(),
        map,
        players: vec![player],
        enemies,
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        player_view,
        result: None,
        frame: 0,
    })
}

fn view_of(player: &Entity) -> PlayerView {
    PlayerView {
        center_x: player.rect.center_x(),
        platform: player.platform,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the level by one frame.
///
/// Order: player (input, then movement), enemies (policy, then movement),
/// bullets of both sides, collisions, then the end-of-round check. A bullet
/// fired this tick first moves and can first hit on the next tick. The
/// simulation keeps running while the result banner is shown.
pub fn tick(state: &LevelState, input: &InputState, rng: &mut impl Rng) -> LevelState {
    let mut next = state.clone();
    next.frame += 1;
    let map = Rc::clone(&state.map);

    // Shots fired this tick join their collection after the collision pass.
    let mut player_fired = Vec::new();
    let mut enemy_fired = Vec::new();

    // ── 1. Player ────────────────────────────────────────────────────────────
    let mut players = Vec::with_capacity(next.players.len());
    for mut player in std::mem::take(&mut next.players) {
        input::handle_input(&mut player, input, &map, |b| player_fired.push(b));
        match update_entity(&mut player, &map, rng) {
            Fate::Alive => players.push(player),
            Fate::Removed => info!("player {} is out of lives", player.name),
        }
    }
    if let Some(player) = players.first() {
        next.player_view = view_of(player);
    }

    // ── 2. Enemies ───────────────────────────────────────────────────────────
    let view = next.player_view;
    let mut enemies = Vec::with_capacity(next.enemies.len());
    for mut enemy in std::mem::take(&mut next.enemies) {
        ai::think(&mut enemy, &view, &next.player_bullets, &map, |b| enemy_fired.push(b));
        match update_entity(&mut enemy, &map, rng) {
            Fate::Alive => enemies.push(enemy),
            Fate::Removed => debug!("enemy {} removed", enemy.name),
        }
    }

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    let player_bullets = weapon::move_bullets(std::mem::take(&mut next.player_bullets), map.width);
    let mut enemy_bullets = weapon::move_bullets(std::mem::take(&mut next.enemy_bullets), map.width);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    if let Some(player) = players.first_mut() {
        enemy_bullets = collision::hit_entity(player, enemy_bullets);
    }
    let mut player_bullets = collision::hit_entities(&mut enemies, player_bullets);
    player_bullets.append(&mut player_fired);
    enemy_bullets.append(&mut enemy_fired);

    trace!(
        "tick {}: {} enemies, {}/{} bullets",
        next.frame,
        enemies.len(),
        player_bullets.len(),
        enemy_bullets.len()
    );

    next.players = players;
    next.enemies = enemies;
    next.player_bullets = player_bullets;
    next.enemy_bullets = enemy_bullets;

    // ── 5. End of round ──────────────────────────────────────────────────────
    if next.result.is_none() {
        if next.player().is_none() {
            next.result = Some(LevelResult { player_won: false, finish_tick: next.frame });
            info!("level {} lost at tick {}", next.level_id, next.frame);
        } else if next.enemies.is_empty() {
            next.result = Some(LevelResult { player_won: true, finish_tick: next.frame });
            info!("level {} won at tick {}", next.level_id, next.frame);
        }
    }

    next
}

/// The result that `next` decided, if `prev` was still undecided.
pub fn newly_decided(prev: &LevelState, next: &LevelState) -> Option<LevelResult> {
    match (prev.result, next.result) {
        (None, Some(result)) => Some(result),
        _ => None,
    }
}

/// The result banner has been shown long enough.
pub fn should_return_to_menu(state: &LevelState) -> bool {
    state
        .result
        .map_or(false, |r| state.frame - r.finish_tick > SWITCH_TO_MENU_DELAY)
}
