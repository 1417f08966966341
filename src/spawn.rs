//! Spawn cadence, weighted type selection and level-based difficulty.

use rand::Rng;

use crate::entities::{EnemyKind, PowerupKind};

pub const INITIAL_SPAWN_RATE: u32 = 120;
pub const MIN_SPAWN_RATE: u32 = 40;
const SPAWN_RATE_STEP: u32 = 10;
/// Frames between level-ups (30 s at 60 FPS).
pub const DIFFICULTY_INTERVAL: u32 = 30 * 60;
/// Chance that a destroyed enemy drops a powerup.
pub const POWERUP_DROP_CHANCE: f64 = 0.2;

/// Pick an index by comparing `draw ∈ [0, 1)` against the cumulative sums of
/// the normalised `weights`.  Falls back to the first index.
pub fn weighted_index(weights: &[f32], draw: f32) -> usize {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w / total;
        if draw < cumulative {
            return i;
        }
    }
    0
}

/// Enemy spawn weights, in `EnemyKind::ALL` order.
pub fn enemy_weights(level: u32) -> [f32; 4] {
    let mut weights = [1.0, 0.6, 0.4, 0.5];
    if level >= 2 {
        weights[1] = 0.8;
    }
    if level >= 3 {
        weights[2] = 0.6;
    }
    if level >= 4 {
        weights[3] = 0.7;
    }
    weights
}

pub fn pick_enemy_kind(level: u32, rng: &mut impl Rng) -> EnemyKind {
    let draw: f32 = rng.gen();
    EnemyKind::ALL[weighted_index(&enemy_weights(level), draw)]
}

const POWERUP_KINDS: [PowerupKind; 6] = [
    PowerupKind::TripleShot,
    PowerupKind::Shield,
    PowerupKind::SpeedBoost,
    PowerupKind::Health,
    PowerupKind::ExtraLife,
    PowerupKind::PowerShot,
];

/// Powerup drop weights, in `POWERUP_KINDS` order.  Extra lives are rare;
/// power shot is locked until level 3.
pub fn powerup_weights(level: u32) -> [f32; 6] {
    let power_shot = if level >= 3 { 0.15 } else { 0.0 };
    [0.25, 0.25, 0.25, 0.2, 0.05, power_shot]
}

pub fn pick_powerup_kind(level: u32, rng: &mut impl Rng) -> PowerupKind {
    let draw: f32 = rng.gen();
    POWERUP_KINDS[weighted_index(&powerup_weights(level), draw)]
}

/// Spawn and difficulty counters of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawner {
    pub spawn_rate: u32,
    pub spawn_counter: u32,
    pub difficulty_timer: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            spawn_rate: INITIAL_SPAWN_RATE,
            spawn_counter: 0,
            difficulty_timer: 0,
        }
    }
}

impl Spawner {
    /// Count one frame; true when an enemy is due.
    pub fn spawn_due(&mut self) -> bool {
        self.spawn_counter += 1;
        if self.spawn_counter >= self.spawn_rate {
            self.spawn_counter = 0;
            true
        } else {
            false
        }
    }

    /// Count one frame; true when the level should go up.  Spawning speeds
    /// up with each level, down to `MIN_SPAWN_RATE`.
    pub fn level_up_due(&mut self) -> bool {
        self.difficulty_timer += 1;
        if self.difficulty_timer < DIFFICULTY_INTERVAL {
            return false;
        }
        self.difficulty_timer = 0;
        self.spawn_rate = self
            .spawn_rate
            .saturating_sub(SPAWN_RATE_STEP)
            .max(MIN_SPAWN_RATE);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_index_walks_cumulative_sums() {
        let w = [1.0, 1.0, 2.0];
        assert_eq!(weighted_index(&w, 0.0), 0);
        assert_eq!(weighted_index(&w, 0.249), 0);
        assert_eq!(weighted_index(&w, 0.26), 1);
        assert_eq!(weighted_index(&w, 0.51), 2);
        assert_eq!(weighted_index(&w, 0.999), 2);
    }

    #[test]
    fn zero_weights_fall_back_to_first() {
        assert_eq!(weighted_index(&[0.0, 0.0], 0.7), 0);
        assert_eq!(weighted_index(&[], 0.7), 0);
    }

    #[test]
    fn level_gates_raise_weights() {
        assert_eq!(enemy_weights(1), [1.0, 0.6, 0.4, 0.5]);
        assert_eq!(enemy_weights(2), [1.0, 0.8, 0.4, 0.5]);
        assert_eq!(enemy_weights(4), [1.0, 0.8, 0.6, 0.7]);
    }
}
