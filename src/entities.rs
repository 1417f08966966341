//! All game entity types.  Data, constructors and read-only queries live
//! here; per-frame behaviour lives in `behavior`, interactions in `collision`.

use std::f32::consts::TAU;

use rand::Rng;

use crate::vector::Vec2;

// ── Shared pieces ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Playfield size in logical pixels, supplied by the environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when `pos` lies outside the playfield grown by `margin` on every side.
    pub fn is_outside(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }
}

/// Anything that occupies a circle on the playfield.
pub trait Body {
    fn pos(&self) -> Vec2;
    fn hitbox_radius(&self) -> f32;
}

fn rand_in(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f32 = 40.0;
pub const PLAYER_MAX_SPEED: f32 = 5.0;
pub const PLAYER_MAX_HEALTH: i32 = 5;
pub const PLAYER_START_LIVES: u32 = 2;
pub const PLAYER_MAX_LIVES: u32 = 5;
pub const SHOOT_COOLDOWN: u32 = 15;
pub const INVULNERABILITY_FRAMES: u32 = 90;
/// Lifetime of every timed powerup (10 s at 60 FPS).
pub const POWERUP_DURATION: u32 = 600;

/// Movement intents, written by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Remaining frames for each timed powerup; 0 means inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivePowerups {
    pub triple_shot: u32,
    pub power_shot: u32,
    pub shield: u32,
    pub speed_boost: u32,
}

impl ActivePowerups {
    pub fn triple_shot(&self) -> bool {
        self.triple_shot > 0
    }

    pub fn power_shot(&self) -> bool {
        self.power_shot > 0
    }

    pub fn shield(&self) -> bool {
        self.shield > 0
    }

    pub fn speed_boost(&self) -> bool {
        self.speed_boost > 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.triple_shot() || self.power_shot() || self.shield() || self.speed_boost()
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub max_speed: f32,
    pub size: f32,
    pub hitbox_radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub lives: u32,
    /// Current facing (radians) and the bank it eases toward.
    pub angle: f32,
    pub target_angle: f32,
    /// Thruster flicker phase for the renderer.
    pub thrust_phase: f32,
    pub intent: MoveIntent,
    pub shoot_cooldown: u32,
    /// Frames of post-hit invulnerability left.
    pub invulnerable_timer: u32,
    pub powerups: ActivePowerups,
}

impl Player {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(viewport.width / 2.0, viewport.height - 100.0),
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            max_speed: PLAYER_MAX_SPEED,
            size: PLAYER_SIZE,
            // Hitbox is 80% of the sprite.
            hitbox_radius: PLAYER_SIZE * 0.8 / 2.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            lives: PLAYER_START_LIVES,
            angle: 0.0,
            target_angle: 0.0,
            thrust_phase: 0.0,
            intent: MoveIntent::default(),
            shoot_cooldown: 0,
            invulnerable_timer: 0,
            powerups: ActivePowerups::default(),
        }
    }

    /// Shield or post-hit invulnerability.
    pub fn is_invulnerable(&self) -> bool {
        self.powerups.shield() || self.invulnerable_timer > 0
    }

    pub fn has_shield(&self) -> bool {
        self.powerups.shield()
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    /// Keep the sprite fully inside `viewport`.
    pub fn clamp_to(&mut self, viewport: Viewport) {
        let half = self.size / 2.0;
        self.pos.x = self.pos.x.clamp(half, (viewport.width - half).max(half));
        self.pos.y = self.pos.y.clamp(half, (viewport.height - half).max(half));
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

const ENEMY_BASE_SIZE: f32 = 35.0;
const ENEMY_BASE_SPEED: f32 = 2.0;
const ENEMY_BASE_SCORE: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Shooter,
    Bomber,
    Zigzag,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Shooter,
        EnemyKind::Bomber,
        EnemyKind::Zigzag,
    ];

    /// Starting health; independent of level.
    pub fn health(self) -> i32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Shooter => 2,
            EnemyKind::Bomber => 3,
            EnemyKind::Zigzag => 1,
        }
    }

    fn size_factor(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Shooter => 0.9,
            EnemyKind::Bomber => 1.3,
            EnemyKind::Zigzag => 0.7,
        }
    }

    fn speed_factor(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Shooter => 0.8,
            EnemyKind::Bomber => 0.6,
            EnemyKind::Zigzag => 1.5,
        }
    }

    fn score_factor(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Shooter => 1.5,
            EnemyKind::Bomber => 2.0,
            EnemyKind::Zigzag => 1.2,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            EnemyKind::Basic => Rgb(200, 50, 50),
            EnemyKind::Shooter => Rgb(50, 100, 200),
            EnemyKind::Bomber => Rgb(100, 50, 150),
            EnemyKind::Zigzag => Rgb(50, 200, 100),
        }
    }

    /// Points for destroying this kind at `level`.
    pub fn score_value(self, level: u32) -> u32 {
        (ENEMY_BASE_SCORE * level as f32 * self.score_factor()).round() as u32
    }
}

/// Per-kind movement state.  One variant per enemy kind, each carrying only
/// what its routine needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    Basic { target: Vec2 },
    Shooter { target: Vec2, cooldown: i32, cooldown_max: i32 },
    Bomber { target: Vec2 },
    Zigzag { target: Vec2 },
}

impl Behavior {
    pub fn kind(&self) -> EnemyKind {
        match self {
            Behavior::Basic { .. } => EnemyKind::Basic,
            Behavior::Shooter { .. } => EnemyKind::Shooter,
            Behavior::Bomber { .. } => EnemyKind::Bomber,
            Behavior::Zigzag { .. } => EnemyKind::Zigzag,
        }
    }

    pub fn target(&self) -> Vec2 {
        match self {
            Behavior::Basic { target }
            | Behavior::Shooter { target, .. }
            | Behavior::Bomber { target }
            | Behavior::Zigzag { target } => *target,
        }
    }

    pub fn set_target(&mut self, to: Vec2) {
        match self {
            Behavior::Basic { target }
            | Behavior::Shooter { target, .. }
            | Behavior::Bomber { target }
            | Behavior::Zigzag { target } => *target = to,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub level: u32,
    pub health: i32,
    pub size: f32,
    pub hitbox_radius: f32,
    pub score_value: u32,
    pub max_speed: f32,
    pub color: Rgb,
    pub anim_offset: f32,
    pub anim_speed: f32,
    pub rotation: f32,
    pub pulse: f32,
    pub behavior_timer: u32,
    pub behavior_duration: u32,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(
        kind: EnemyKind,
        pos: Vec2,
        level: u32,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> Self {
        let level = level.max(1);
        let size = ENEMY_BASE_SIZE * kind.size_factor();
        let base_speed = ENEMY_BASE_SPEED * (1.0 + (level - 1) as f32 * 0.1);
        let target = Vec2::new(
            rand_in(rng, viewport.width * 0.2, viewport.width * 0.8),
            rand_in(rng, viewport.height * 0.2, viewport.height * 0.6),
        );
        let behavior = match kind {
            EnemyKind::Basic => Behavior::Basic { target },
            EnemyKind::Shooter => {
                // Shoots faster at higher levels.
                let cooldown_max = (rand_in(rng, 90.0, 120.0) / level as f32).floor() as i32;
                Behavior::Shooter { target, cooldown: 0, cooldown_max }
            }
            EnemyKind::Bomber => Behavior::Bomber { target },
            EnemyKind::Zigzag => Behavior::Zigzag { target },
        };
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            level,
            health: kind.health(),
            size,
            hitbox_radius: size / 2.0,
            score_value: kind.score_value(level),
            max_speed: base_speed * kind.speed_factor(),
            color: kind.color(),
            anim_offset: rng.gen_range(0.0..TAU),
            anim_speed: rand_in(rng, 0.03, 0.08),
            rotation: 0.0,
            pulse: 0.0,
            behavior_timer: 0,
            behavior_duration: rng.gen_range(60..120),
            behavior,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.behavior.kind()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Subtract `damage`; returns true when this hit destroyed the enemy.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        let was_alive = !self.is_dead();
        self.health -= damage;
        was_alive && self.is_dead()
    }

    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        viewport.is_outside(self.pos, self.size * 2.0)
    }
}

impl Body for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_SPEED: f32 = 10.0;
const PROJECTILE_SIZE: f32 = 15.0;
pub const ENEMY_PROJECTILE_SPEED: f32 = 5.0;
const ENEMY_PROJECTILE_SIZE: f32 = 10.0;

/// A player shot.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub size: f32,
    pub hitbox_radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, damage: i32, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel,
            damage,
            size: PROJECTILE_SIZE,
            hitbox_radius: PROJECTILE_SIZE * 0.8 / 2.0,
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rand_in(rng, -0.1, 0.1),
        }
    }

    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        viewport.is_outside(self.pos, self.size)
    }
}

impl Body for Projectile {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }
}

/// A shot fired by a shooter-type enemy.  Flies straight, never steers.
#[derive(Clone, Debug)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub size: f32,
    pub hitbox_radius: f32,
    pub color: Rgb,
    pub rotation: f32,
}

impl EnemyProjectile {
    /// Aim from `origin` along `direction` at the fixed enemy shot speed.
    pub fn aimed(origin: Vec2, direction: Vec2, color: Rgb) -> Self {
        Self {
            pos: origin,
            vel: direction.normalize().scale(ENEMY_PROJECTILE_SPEED),
            damage: 1,
            size: ENEMY_PROJECTILE_SIZE,
            hitbox_radius: 4.0,
            color,
            rotation: 0.0,
        }
    }

    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        viewport.is_outside(self.pos, self.size)
    }
}

impl Body for EnemyProjectile {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }
}

// ── Powerups ──────────────────────────────────────────────────────────────────

const POWERUP_SIZE: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    TripleShot,
    Shield,
    SpeedBoost,
    Health,
    ExtraLife,
    /// Double-damage shots; only drops from level 3 on.
    PowerShot,
}

impl PowerupKind {
    pub fn color(self) -> Rgb {
        match self {
            PowerupKind::TripleShot => Rgb(255, 150, 0),
            PowerupKind::Shield => Rgb(100, 150, 255),
            PowerupKind::SpeedBoost => Rgb(0, 255, 150),
            PowerupKind::Health => Rgb(255, 100, 100),
            PowerupKind::ExtraLife => Rgb(255, 50, 200),
            PowerupKind::PowerShot => Rgb(255, 230, 80),
        }
    }

    /// Pickup message shown on screen.
    pub fn message(self) -> &'static str {
        match self {
            PowerupKind::TripleShot => "TRIPLE SHOT!",
            PowerupKind::Shield => "SHIELD UP!",
            PowerupKind::SpeedBoost => "SPEED BOOST!",
            PowerupKind::Health => "HEALTH +2",
            PowerupKind::ExtraLife => "EXTRA LIFE!",
            PowerupKind::PowerShot => "POWER SHOT!",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub kind: PowerupKind,
    pub size: f32,
    pub hitbox_radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub osc_offset: f32,
    pub osc_speed: f32,
    pub pulse: f32,
    pub particle_timer: u32,
}

impl Powerup {
    pub fn new(pos: Vec2, kind: PowerupKind, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(rand_in(rng, -1.0, 1.0), rand_in(rng, 1.0, 2.0)),
            acc: Vec2::ZERO,
            kind,
            size: POWERUP_SIZE,
            hitbox_radius: POWERUP_SIZE / 2.0,
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rand_in(rng, -0.05, 0.05),
            osc_offset: rng.gen_range(0.0..TAU),
            osc_speed: rand_in(rng, 0.03, 0.07),
            pulse: 0.0,
            particle_timer: 0,
        }
    }

    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        viewport.is_outside(self.pos, self.size)
    }
}

impl Body for Powerup {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.hitbox_radius
    }
}

// ── Particles & background ────────────────────────────────────────────────────

pub const PARTICLE_LIFE: f32 = 100.0;
const SPARK_TRAIL_LEN: usize = 5;

/// Purely cosmetic debris.  Sparks additionally keep a short position trail.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub life: f32,
    pub decay: f32,
    pub original_size: f32,
    pub color: Option<Rgb>,
    pub trail: Vec<Vec2>,
    pub trail_len: usize,
}

impl Particle {
    /// Explosion debris flying off in a random direction.
    pub fn burst(pos: Vec2, size: f32, color: Option<Rgb>, rng: &mut impl Rng) -> Self {
        let size = size.max(0.5);
        Self {
            pos,
            vel: Vec2::random_unit(rng).scale(rand_in(rng, 1.0, 3.0)),
            acc: Vec2::ZERO,
            life: PARTICLE_LIFE,
            decay: rand_in(rng, 1.5, 3.0),
            original_size: rand_in(rng, size * 0.5, size),
            color,
            trail: Vec::new(),
            trail_len: 0,
        }
    }

    /// A directed spark with a fading trail.
    pub fn spark(
        pos: Vec2,
        angle: f32,
        speed: f32,
        size: f32,
        color: Rgb,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            vel: Vec2::from_angle(angle).scale(speed),
            decay: rand_in(rng, 2.0, 4.0),
            trail_len: SPARK_TRAIL_LEN,
            ..Self::burst(pos, size, Some(color), rng)
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Render size, shrinking with remaining life.
    pub fn size(&self) -> f32 {
        (self.original_size * self.life / PARTICLE_LIFE).max(0.0)
    }

    /// Render alpha in `0..=255`, fading with remaining life.
    pub fn alpha(&self) -> u8 {
        (255.0 * self.life / PARTICLE_LIFE).clamp(0.0, 255.0) as u8
    }
}

#[derive(Clone, Debug)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Star {
    pub fn random(viewport: Viewport, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rand_in(rng, 0.0, viewport.width),
                rand_in(rng, 0.0, viewport.height),
            ),
            size: rand_in(rng, 1.0, 3.0),
            speed: rand_in(rng, 0.1, 0.5),
        }
    }
}
