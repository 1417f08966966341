use space_potato::collision::*;
use space_potato::entities::*;
use space_potato::feedback::Cue;
use space_potato::session::GameSession;
use space_potato::vector::Vec2;

use rand::rngs::StdRng;
use rand::SeedableRng;

const VP: Viewport = Viewport::new(800.0, 600.0);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Bare circle for exercising the hit test directly.
struct Dot {
    pos: Vec2,
    r: f32,
}

impl Body for Dot {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn hitbox_radius(&self) -> f32 {
        self.r
    }
}

fn dot(x: f32, y: f32, r: f32) -> Dot {
    Dot { pos: Vec2::new(x, y), r }
}

fn session_with_enemy_on_player(kind: EnemyKind, rng: &mut StdRng) -> GameSession {
    let mut s = GameSession::new(VP, rng);
    let at = s.player.pos.add(Vec2::new(10.0, 0.0));
    s.enemies.push(Enemy::new(kind, at, 1, VP, rng));
    s
}

// ── Hit test ──────────────────────────────────────────────────────────────────

#[test]
fn circles_hit_inside_the_radius_sum() {
    assert!(collides(&dot(0.0, 0.0, 5.0), &dot(9.0, 0.0, 5.0), 0.0));
    assert!(!collides(&dot(0.0, 0.0, 5.0), &dot(10.0, 0.0, 5.0), 0.0));
}

#[test]
fn buffer_widens_the_hit() {
    assert!(!collides(&dot(0.0, 0.0, 5.0), &dot(12.0, 0.0, 5.0), 0.0));
    assert!(collides(&dot(0.0, 0.0, 5.0), &dot(12.0, 0.0, 5.0), PLAYER_CONTACT_BUFFER));
}

#[test]
fn invalid_bodies_never_collide() {
    let good = dot(0.0, 0.0, 10.0);
    assert!(!collides(&good, &dot(f32::NAN, 0.0, 10.0), 0.0));
    assert!(!collides(&good, &dot(0.0, f32::INFINITY, 10.0), 0.0));
    assert!(!collides(&good, &dot(0.0, 0.0, 0.0), 0.0));
    assert!(!collides(&good, &dot(0.0, 0.0, -3.0), 0.0));
    assert!(!collides(&dot(0.0, 0.0, f32::NAN), &good, 0.0));
}

// ── Enemy shots ───────────────────────────────────────────────────────────────

#[test]
fn enemy_shot_hurts_and_is_consumed() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    s.enemy_projectiles
        .push(EnemyProjectile::aimed(s.player.pos, Vec2::new(0.0, 1.0), Rgb(1, 1, 1)));

    resolve_enemy_shots(&mut s, &mut rng);
    assert_eq!(s.player.health, 4);
    assert!(s.enemy_projectiles.is_empty());
    assert_eq!(s.particles.len(), 5);
}

#[test]
fn invulnerable_player_ignores_enemy_shots() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    s.player.invulnerable_timer = 30;
    s.enemy_projectiles
        .push(EnemyProjectile::aimed(s.player.pos, Vec2::new(0.0, 1.0), Rgb(1, 1, 1)));

    resolve_enemy_shots(&mut s, &mut rng);
    assert_eq!(s.player.health, 5);
    assert_eq!(s.enemy_projectiles.len(), 1);
}

// ── Ramming ───────────────────────────────────────────────────────────────────

#[test]
fn ramming_enemy_is_destroyed_and_hurts() {
    let mut rng = seeded_rng();
    let mut s = session_with_enemy_on_player(EnemyKind::Bomber, &mut rng);

    resolve_enemy_contact(&mut s, &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.player.health, 4);
    assert_eq!(s.score, 0);
    assert_eq!(s.feedback.shake.intensity, 10.0);
    assert_eq!(s.feedback.shake.duration, 10);
    assert_eq!(s.feedback.pending_cues(), &[Cue::Explosion]);
}

#[test]
fn ramming_during_invulnerability_does_nothing() {
    let mut rng = seeded_rng();
    let mut s = session_with_enemy_on_player(EnemyKind::Basic, &mut rng);
    s.player.invulnerable_timer = 10;

    resolve_enemy_contact(&mut s, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.player.health, 5);
}

#[test]
fn shield_turns_damage_back_on_the_enemy() {
    let mut rng = seeded_rng();
    let mut s = session_with_enemy_on_player(EnemyKind::Bomber, &mut rng);
    s.player.powerups.shield = POWERUP_DURATION;

    resolve_enemy_contact(&mut s, &mut rng);
    assert_eq!(s.player.health, 5);
    assert_eq!(s.enemies.len(), 1);
    let bomber = &s.enemies[0];
    assert_eq!(bomber.health, 2);
    // Knocked away from the player, to the right.
    assert!((bomber.vel.mag() - 4.0).abs() < 1e-4);
    assert!(bomber.vel.x > 0.0);
    assert!(!s.particles.is_empty());
}

#[test]
fn shield_kill_awards_score() {
    let mut rng = seeded_rng();
    let mut s = session_with_enemy_on_player(EnemyKind::Basic, &mut rng);
    s.player.powerups.shield = POWERUP_DURATION;

    resolve_enemy_contact(&mut s, &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 100);
    assert!(s.player.has_shield());
}

// ── Player shots ──────────────────────────────────────────────────────────────

#[test]
fn each_enemy_takes_one_shot_per_frame() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    let at = Vec2::new(200.0, 200.0);
    s.enemies.push(Enemy::new(EnemyKind::Bomber, at, 1, VP, &mut rng));
    for _ in 0..2 {
        s.projectiles
            .push(Projectile::new(at, Vec2::new(0.0, -10.0), 1, &mut rng));
    }

    resolve_player_shots(&mut s, &mut rng);
    assert_eq!(s.enemies[0].health, 2);
    assert_eq!(s.projectiles.len(), 1);
}

#[test]
fn shots_that_miss_are_kept() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    s.enemies
        .push(Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), 1, VP, &mut rng));
    s.projectiles.push(Projectile::new(
        Vec2::new(600.0, 100.0),
        Vec2::new(0.0, -10.0),
        1,
        &mut rng,
    ));

    resolve_player_shots(&mut s, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.projectiles.len(), 1);
}

// ── Pickups & culling ─────────────────────────────────────────────────────────

#[test]
fn pickup_applies_and_announces() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    s.powerups
        .push(Powerup::new(s.player.pos, PowerupKind::Shield, &mut rng));

    resolve_pickups(&mut s, &mut rng);
    assert!(s.powerups.is_empty());
    assert!(s.player.has_shield());
    assert_eq!(s.feedback.pending_cues(), &[Cue::Powerup]);
    let msg = s.feedback.message.as_ref().map(|m| m.text.as_str());
    assert_eq!(msg, Some("SHIELD UP!"));
    assert_eq!(s.particles.len(), 10);
}

#[test]
fn offscreen_entities_are_dropped_quietly() {
    let mut rng = seeded_rng();
    let mut s = GameSession::new(VP, &mut rng);
    s.enemies
        .push(Enemy::new(EnemyKind::Basic, Vec2::new(400.0, 900.0), 1, VP, &mut rng));
    s.enemies
        .push(Enemy::new(EnemyKind::Basic, Vec2::new(400.0, -50.0), 1, VP, &mut rng));
    s.projectiles.push(Projectile::new(
        Vec2::new(400.0, -40.0),
        Vec2::new(0.0, -10.0),
        1,
        &mut rng,
    ));
    s.powerups
        .push(Powerup::new(Vec2::new(400.0, 700.0), PowerupKind::Health, &mut rng));

    cull_offscreen(&mut s);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].pos.y, -50.0);
    assert!(s.projectiles.is_empty());
    assert!(s.powerups.is_empty());
    assert_eq!(s.score, 0);
    assert!(s.feedback.pending_cues().is_empty());
}
