//! The playing-mode frame step.
//!
//! `tick` advances every entity, resolves combat, runs spawning and
//! difficulty, and reports whether the match is over.  All randomness comes
//! through `rng` so callers control determinism (tests use a seeded RNG).

use rand::Rng;

use crate::behavior::{
    advance_enemy, advance_enemy_projectile, advance_particle, advance_player, advance_powerup,
    advance_projectile, advance_star, fire, Surroundings,
};
use crate::collision::{
    cull_offscreen, resolve_enemy_contact, resolve_enemy_shots, resolve_pickups,
    resolve_player_shots,
};
use crate::entities::{Enemy, Rgb};
use crate::feedback::Cue;
use crate::session::GameSession;
use crate::spawn::pick_enemy_kind;
use crate::vector::Vec2;

/// Spawn height above the visible area.
pub const SPAWN_Y: f32 = -50.0;
const MUZZLE_COLOR: Rgb = Rgb(255, 200, 50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The player ran out of lives this frame.
    PlayerDefeated,
}

/// Fire the player's weapon if its cooldown allows.  Returns true on a shot.
pub fn player_shoot(session: &mut GameSession, rng: &mut impl Rng) -> bool {
    let shots = fire(&mut session.player, rng);
    if shots.is_empty() {
        return false;
    }
    session.projectiles.extend(shots);
    let muzzle = session
        .player
        .pos
        .sub(Vec2::new(0.0, session.player.size / 2.0));
    session.explode(muzzle, 5, 5.0, Some(MUZZLE_COLOR), rng);
    session.feedback.cue(Cue::Shoot);
    true
}

/// Put one enemy of a level-weighted kind just above the top edge.
pub fn spawn_enemy(session: &mut GameSession, rng: &mut impl Rng) {
    let kind = pick_enemy_kind(session.level, rng);
    let x = if session.viewport.width > 0.0 {
        rng.gen_range(0.0..session.viewport.width)
    } else {
        0.0
    };
    let enemy = Enemy::new(kind, Vec2::new(x, SPAWN_Y), session.level, session.viewport, rng);
    log::trace!("spawned {:?} at x={x:.0}", kind);
    session.enemies.push(enemy);
}

/// Scroll the background.  Runs in every mode.
pub fn advance_stars(session: &mut GameSession, rng: &mut impl Rng) {
    let viewport = session.viewport;
    for star in &mut session.stars {
        advance_star(star, viewport, rng);
    }
}

/// Advance the simulation by one frame.
pub fn tick(session: &mut GameSession, rng: &mut impl Rng) -> TickOutcome {
    session.frame += 1;
    advance_stars(session, rng);

    // ── 1. Movement ──────────────────────────────────────────────────────────
    advance_player(&mut session.player, session.viewport);

    for shot in &mut session.projectiles {
        advance_projectile(shot);
    }
    for shot in &mut session.enemy_projectiles {
        advance_enemy_projectile(shot);
    }

    let env = Surroundings {
        frame: session.frame,
        player_pos: session.player.pos,
        viewport: session.viewport,
    };
    let mut spawns = Vec::new();
    for enemy in &mut session.enemies {
        spawns.extend(advance_enemy(enemy, &env, rng));
    }
    for powerup in &mut session.powerups {
        spawns.extend(advance_powerup(powerup, session.frame, rng));
    }
    for particle in &mut session.particles {
        advance_particle(particle, rng);
    }
    session.apply(spawns, rng);

    // ── 2. Combat ────────────────────────────────────────────────────────────
    resolve_enemy_shots(session, rng);
    resolve_enemy_contact(session, rng);
    resolve_player_shots(session, rng);
    resolve_pickups(session, rng);
    cull_offscreen(session);

    // ── 3. Spawning & difficulty ─────────────────────────────────────────────
    if session.spawner.spawn_due() {
        spawn_enemy(session, rng);
    }
    if session.spawner.level_up_due() {
        session.level += 1;
        session.feedback.show_banner(format!("LEVEL {}", session.level));
        log::debug!(
            "level up: {} (spawn every {} frames)",
            session.level,
            session.spawner.spawn_rate
        );
    }

    // ── 4. Terminal condition ────────────────────────────────────────────────
    if session.player.is_dead() {
        TickOutcome::PlayerDefeated
    } else {
        TickOutcome::Continue
    }
}
