//! One match worth of state.  The session owns every entity collection
//! exclusively; entities reach the rest of the world only through the
//! [`Spawn`] values it applies.

use rand::Rng;

use crate::behavior::Spawn;
use crate::entities::{
    Enemy, EnemyProjectile, Particle, Player, Powerup, Projectile, Rgb, Star, Viewport,
};
use crate::feedback::Feedback;
use crate::spawn::Spawner;
use crate::vector::Vec2;

pub const STAR_COUNT: usize = 200;

#[derive(Clone, Debug)]
pub struct GameSession {
    pub viewport: Viewport,
    pub score: u32,
    pub level: u32,
    pub frame: u64,
    pub spawner: Spawner,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub feedback: Feedback,
}

impl GameSession {
    pub fn new(viewport: Viewport, rng: &mut impl Rng) -> Self {
        Self {
            viewport,
            score: 0,
            level: 1,
            frame: 0,
            spawner: Spawner::default(),
            player: Player::new(viewport),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            stars: (0..STAR_COUNT).map(|_| Star::random(viewport, rng)).collect(),
            feedback: Feedback::default(),
        }
    }

    /// Fresh player, empty collections, counters zeroed.  The starfield and
    /// viewport carry over.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.frame = 0;
        self.spawner = Spawner::default();
        self.player = Player::new(self.viewport);
        self.projectiles.clear();
        self.enemies.clear();
        self.enemy_projectiles.clear();
        self.powerups.clear();
        self.particles.clear();
        self.feedback.reset();
    }

    /// Adopt new viewport dimensions and pull the player back inside.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.clamp_to(viewport);
        for star in &mut self.stars {
            star.pos.x = star.pos.x.min(viewport.width);
            star.pos.y = star.pos.y.min(viewport.height);
        }
    }

    /// Emit `count` debris particles at `pos`.
    pub fn explode(
        &mut self,
        pos: Vec2,
        count: usize,
        size: f32,
        color: Option<Rgb>,
        rng: &mut impl Rng,
    ) {
        for _ in 0..count {
            self.particles.push(Particle::burst(pos, size, color, rng));
        }
    }

    pub fn apply(&mut self, spawns: Vec<Spawn>, rng: &mut impl Rng) {
        for spawn in spawns {
            match spawn {
                Spawn::EnemyShot(shot) => self.enemy_projectiles.push(shot),
                Spawn::Burst { pos, count, size, color } => {
                    self.explode(pos, count, size, color, rng)
                }
                Spawn::Particle(p) => self.particles.push(p),
            }
        }
    }

    pub fn entity_count(&self) -> usize {
        self.projectiles.len()
            + self.enemies.len()
            + self.enemy_projectiles.len()
            + self.powerups.len()
            + self.particles.len()
    }
}
