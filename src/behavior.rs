//! Per-frame motion for every entity kind.
//!
//! Entities never touch the session directly.  Anything an update wants to
//! create (a shot, a muzzle flash, a hover spark) comes back as a [`Spawn`]
//! that the session applies afterwards.

use std::f32::consts::PI;

use rand::Rng;

use crate::entities::{
    Behavior, Enemy, EnemyKind, EnemyProjectile, Particle, Player, Powerup, PowerupKind,
    Projectile, Rgb, Star, Viewport, INVULNERABILITY_FRAMES, PLAYER_MAX_LIVES, POWERUP_DURATION,
    PROJECTILE_SPEED, SHOOT_COOLDOWN,
};
use crate::feedback::Feedback;
use crate::vector::{map_range, Vec2};

const PLAYER_THRUST: f32 = 0.5;
const PLAYER_DRAG: f32 = 0.9;
const POWERUP_DRAG: f32 = 0.98;
const POWERUP_GRAVITY: f32 = 0.05;
const POWERUP_MAX_SPEED: f32 = 3.0;
const PARTICLE_DRAG: f32 = 0.95;
const SHOOTER_IDEAL_DISTANCE: f32 = 250.0;
const SHOOTER_RANGE: f32 = 400.0;
const HEALTH_PICKUP: i32 = 2;

/// A side effect produced by an entity update.
#[derive(Clone, Debug)]
pub enum Spawn {
    EnemyShot(EnemyProjectile),
    Burst { pos: Vec2, count: usize, size: f32, color: Option<Rgb> },
    Particle(Particle),
}

/// Read-only view of the world handed to behaviour routines.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings {
    pub frame: u64,
    pub player_pos: Vec2,
    pub viewport: Viewport,
}

// ── Player ────────────────────────────────────────────────────────────────────

pub fn advance_player(player: &mut Player, viewport: Viewport) {
    let intent = player.intent;
    let mut acc = Vec2::ZERO;
    if intent.left {
        acc.x -= PLAYER_THRUST;
    }
    if intent.right {
        acc.x += PLAYER_THRUST;
    }
    if intent.up {
        acc.y -= PLAYER_THRUST;
    }
    if intent.down {
        acc.y += PLAYER_THRUST;
    }
    player.acc = acc;

    let max_speed = if player.powerups.speed_boost() {
        player.max_speed * 1.5
    } else {
        player.max_speed
    };
    player.vel = player.vel.add(player.acc).limit(max_speed);
    player.pos.add_assign(player.vel);
    player.acc = Vec2::ZERO;
    player.vel.scale_assign(PLAYER_DRAG);
    player.clamp_to(viewport);

    player.shoot_cooldown = player.shoot_cooldown.saturating_sub(1);
    player.invulnerable_timer = player.invulnerable_timer.saturating_sub(1);

    let p = &mut player.powerups;
    p.triple_shot = p.triple_shot.saturating_sub(1);
    p.power_shot = p.power_shot.saturating_sub(1);
    p.speed_boost = p.speed_boost.saturating_sub(1);
    if p.shield == 1 {
        log::debug!("shield expired");
    }
    p.shield = p.shield.saturating_sub(1);

    player.thrust_phase += 0.2;
    player.target_angle = player.vel.x * 0.05;
    player.angle += (player.target_angle - player.angle) * 0.1;
}

/// Apply one hit to the player.  Returns false when invulnerability absorbed it.
///
/// A hit clears every powerup, starts the post-hit invulnerability window and
/// shakes the screen.  Emptying health costs a life; health refills while
/// lives remain.
pub fn damage_player(player: &mut Player, amount: i32, feedback: &mut Feedback) -> bool {
    if player.is_invulnerable() {
        return false;
    }
    player.health = (player.health - amount).max(0);
    player.powerups.clear();
    feedback.shake.apply(10.0, 5);
    player.invulnerable_timer = INVULNERABILITY_FRAMES;

    if player.health == 0 {
        player.lives = player.lives.saturating_sub(1);
        if player.lives > 0 {
            player.health = player.max_health;
        }
        log::debug!("player lost a life, {} left", player.lives);
    }
    true
}

/// Grant a collected powerup.  Shot upgrades exclude each other, as do
/// shield and speed boost.
pub fn apply_powerup(player: &mut Player, kind: PowerupKind) {
    let p = &mut player.powerups;
    match kind {
        PowerupKind::TripleShot | PowerupKind::PowerShot => {
            p.triple_shot = 0;
            p.power_shot = 0;
        }
        PowerupKind::Shield | PowerupKind::SpeedBoost => {
            p.shield = 0;
            p.speed_boost = 0;
        }
        PowerupKind::Health | PowerupKind::ExtraLife => {}
    }
    match kind {
        PowerupKind::TripleShot => p.triple_shot = POWERUP_DURATION,
        PowerupKind::PowerShot => p.power_shot = POWERUP_DURATION,
        PowerupKind::Shield => p.shield = POWERUP_DURATION,
        PowerupKind::SpeedBoost => p.speed_boost = POWERUP_DURATION,
        PowerupKind::Health => {
            player.health = (player.health + HEALTH_PICKUP).min(player.max_health);
        }
        PowerupKind::ExtraLife => {
            player.lives = (player.lives + 1).min(PLAYER_MAX_LIVES);
        }
    }
}

/// Fire if the cooldown allows.  Returns the new shots (empty when cooling down).
pub fn fire(player: &mut Player, rng: &mut impl Rng) -> Vec<Projectile> {
    if player.shoot_cooldown > 0 {
        return Vec::new();
    }
    player.shoot_cooldown = SHOOT_COOLDOWN;

    let damage = if player.powerups.power_shot() { 2 } else { 1 };
    let speed = PROJECTILE_SPEED;
    let velocities: &[Vec2] = if player.powerups.triple_shot() {
        &[
            Vec2::new(0.0, -speed),
            Vec2::new(-2.0, -9.0),
            Vec2::new(2.0, -9.0),
        ]
    } else {
        &[Vec2::new(0.0, -speed)]
    };
    velocities
        .iter()
        .map(|&vel| Projectile::new(player.pos, vel, damage, rng))
        .collect()
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// One frame of enemy AI and physics.
pub fn advance_enemy(enemy: &mut Enemy, env: &Surroundings, rng: &mut impl Rng) -> Vec<Spawn> {
    enemy.behavior_timer += 1;
    if enemy.behavior_timer >= enemy.behavior_duration {
        retarget(enemy, env, rng);
        enemy.behavior_timer = 0;
    }

    let mut spawns = Vec::new();
    let f = env.frame as f32;
    let o = enemy.anim_offset;
    let to_player = env.player_pos.sub(enemy.pos);
    let dist = to_player.mag();

    let steer = match &mut enemy.behavior {
        Behavior::Basic { target } => {
            let mut dir = target.sub(enemy.pos).normalize().scale(0.2);
            dir.x += (f * 0.02 + o).sin() * 0.05;
            dir
        }
        Behavior::Shooter { cooldown, cooldown_max, .. } => {
            let steer = if dist < SHOOTER_IDEAL_DISTANCE * 0.8 {
                to_player.normalize().scale(-0.2)
            } else if dist > SHOOTER_IDEAL_DISTANCE * 1.2 {
                to_player.normalize().scale(0.1)
            } else {
                to_player.perp().normalize().scale((f * 0.03 + o).sin() * 0.2)
            };
            if *cooldown <= 0 && dist < SHOOTER_RANGE {
                spawns.push(Spawn::EnemyShot(EnemyProjectile::aimed(
                    enemy.pos,
                    to_player,
                    enemy.color,
                )));
                spawns.push(Spawn::Burst {
                    pos: enemy.pos,
                    count: 3,
                    size: 5.0,
                    color: Some(enemy.color),
                });
                *cooldown = *cooldown_max;
            }
            steer
        }
        Behavior::Bomber { .. } => {
            // Pull strengthens as the gap closes.
            let pull = map_range(dist, 0.0, 400.0, 0.3, 0.05);
            let mut dir = to_player.normalize().scale(pull);
            dir.x += (f * 0.1 + o).sin() * 0.02;
            dir.y += (f * 0.1 + o).cos() * 0.02;
            dir
        }
        Behavior::Zigzag { .. } => {
            let mut dir = to_player.normalize().scale(0.15);
            dir.x += (f * 0.1 + o).sin() * 0.5;
            dir.y += (f * 0.08 + o).cos() * 0.5;
            dir
        }
    };
    enemy.acc.add_assign(steer);

    enemy.vel = enemy.vel.add(enemy.acc).limit(enemy.max_speed);
    enemy.pos.add_assign(enemy.vel);
    enemy.acc = Vec2::ZERO;

    let spin = if enemy.kind() == EnemyKind::Zigzag { 3.0 } else { 1.0 };
    enemy.rotation = f * 0.01 * spin;
    enemy.pulse = (f * enemy.anim_speed + o).sin() * 0.1;

    if let Behavior::Shooter { cooldown, .. } = &mut enemy.behavior {
        if *cooldown > 0 {
            *cooldown -= 1;
        }
    }
    spawns
}

/// Re-roll the behaviour duration and pick a fresh target for the kind.
fn retarget(enemy: &mut Enemy, env: &Surroundings, rng: &mut impl Rng) {
    enemy.behavior_duration = rng.gen_range(60..120);
    let (w, h) = (env.viewport.width, env.viewport.height);
    let target = match enemy.behavior {
        Behavior::Basic { .. } => Vec2::new(
            rng.gen_range(w * 0.1..=w * 0.9),
            rng.gen_range(h * 0.1..=h * 0.7),
        ),
        Behavior::Shooter { .. } => Vec2::new(
            rng.gen_range(w * 0.2..=w * 0.8),
            rng.gen_range(h * 0.2..=h * 0.5),
        ),
        Behavior::Bomber { .. } => env.player_pos,
        Behavior::Zigzag { .. } => env.player_pos.add(Vec2::new(
            rng.gen_range(-200.0..=200.0),
            rng.gen_range(-200.0..=200.0),
        )),
    };
    enemy.behavior.set_target(target);
}

pub fn advance_enemy_projectile(shot: &mut EnemyProjectile) {
    shot.pos.add_assign(shot.vel);
    shot.rotation += 0.2;
}

// ── Everything else ───────────────────────────────────────────────────────────

pub fn advance_projectile(shot: &mut Projectile) {
    shot.pos.add_assign(shot.vel);
    shot.rotation += shot.rotation_speed;
}

pub fn advance_powerup(powerup: &mut Powerup, frame: u64, rng: &mut impl Rng) -> Vec<Spawn> {
    powerup.acc.y = POWERUP_GRAVITY;
    powerup.vel = powerup.vel.add(powerup.acc).limit(POWERUP_MAX_SPEED);
    powerup.pos.add_assign(powerup.vel);
    powerup.acc = Vec2::ZERO;
    powerup.vel.x += rng.gen_range(-0.1..=0.1);
    powerup.vel.scale_assign(POWERUP_DRAG);

    powerup.rotation += powerup.rotation_speed;
    powerup.pulse = (frame as f32 * powerup.osc_speed + powerup.osc_offset).sin() * 0.2;

    powerup.particle_timer += 1;
    if powerup.particle_timer <= 10 {
        return Vec::new();
    }
    powerup.particle_timer = 0;

    // Hover spark drifting mostly upward.
    let offset = powerup.size / 2.0;
    let at = powerup.pos.add(Vec2::new(
        rng.gen_range(-offset..=offset),
        rng.gen_range(-offset..=offset),
    ));
    let angle = rng.gen_range(-0.5..=0.5) + PI * 1.5;
    let speed = rng.gen_range(0.5..=1.0);
    let size = rng.gen_range(2.0..=4.0);
    vec![Spawn::Particle(Particle::spark(at, angle, speed, size, powerup.kind.color(), rng))]
}

pub fn advance_particle(particle: &mut Particle, rng: &mut impl Rng) {
    if particle.trail_len > 0 {
        particle.trail.push(particle.pos);
        if particle.trail.len() > particle.trail_len {
            particle.trail.remove(0);
        }
    }
    particle.acc.add_assign(Vec2::new(
        rng.gen_range(-0.1..=0.1),
        rng.gen_range(-0.1..=0.1),
    ));
    particle.vel.add_assign(particle.acc);
    particle.pos.add_assign(particle.vel);
    particle.acc = Vec2::ZERO;
    particle.vel.scale_assign(PARTICLE_DRAG);
    particle.life -= particle.decay;
}

pub fn advance_star(star: &mut Star, viewport: Viewport, rng: &mut impl Rng) {
    star.pos.y += star.speed;
    if star.pos.y > viewport.height {
        star.pos.y = 0.0;
        star.pos.x = if viewport.width > 0.0 {
            rng.gen_range(0.0..viewport.width)
        } else {
            0.0
        };
    }
}
