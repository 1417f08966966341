use space_potato::behavior::*;
use space_potato::entities::*;
use space_potato::feedback::Feedback;
use space_potato::vector::Vec2;

use rand::rngs::StdRng;
use rand::SeedableRng;

const VP: Viewport = Viewport::new(800.0, 600.0);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn surroundings(player_pos: Vec2) -> Surroundings {
    Surroundings { frame: 10, player_pos, viewport: VP }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_bottom_centre() {
    let p = Player::new(VP);
    assert_eq!(p.pos, Vec2::new(400.0, 500.0));
    assert_eq!(p.health, 5);
    assert_eq!(p.max_health, 5);
    assert_eq!(p.lives, 2);
    assert!((p.hitbox_radius - 16.0).abs() < 1e-6);
    assert!(!p.is_invulnerable());
}

#[test]
fn held_intent_accelerates_then_drag_slows() {
    let mut p = Player::new(VP);
    p.intent.right = true;
    advance_player(&mut p, VP);
    assert!(p.pos.x > 400.0);
    assert_eq!(p.pos.y, 500.0);

    p.intent.right = false;
    let speed = p.vel.mag();
    advance_player(&mut p, VP);
    assert!(p.vel.mag() < speed);
}

#[test]
fn player_speed_never_exceeds_max() {
    let mut p = Player::new(VP);
    p.intent.left = true;
    p.intent.up = true;
    for _ in 0..200 {
        advance_player(&mut p, VP);
        assert!(p.vel.mag() <= PLAYER_MAX_SPEED + 1e-4);
    }
}

#[test]
fn player_is_clamped_inside_the_viewport() {
    let mut p = Player::new(VP);
    p.intent.left = true;
    for _ in 0..500 {
        advance_player(&mut p, VP);
    }
    assert_eq!(p.pos.x, PLAYER_SIZE / 2.0);
}

#[test]
fn timed_powerups_count_down_each_frame() {
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::SpeedBoost);
    apply_powerup(&mut p, PowerupKind::TripleShot);
    for _ in 0..10 {
        advance_player(&mut p, VP);
    }
    assert_eq!(p.powerups.speed_boost, POWERUP_DURATION - 10);
    assert_eq!(p.powerups.triple_shot, POWERUP_DURATION - 10);
}

#[test]
fn damage_costs_health_and_grants_invulnerability() {
    let mut p = Player::new(VP);
    let mut fb = Feedback::default();
    apply_powerup(&mut p, PowerupKind::TripleShot);

    assert!(damage_player(&mut p, 1, &mut fb));
    assert_eq!(p.health, 4);
    assert_eq!(p.invulnerable_timer, INVULNERABILITY_FRAMES);
    assert!(!p.powerups.any());
    assert_eq!(fb.shake.intensity, 10.0);
    assert_eq!(fb.shake.duration, 5);

    // Absorbed while the window lasts.
    assert!(!damage_player(&mut p, 1, &mut fb));
    assert_eq!(p.health, 4);
}

#[test]
fn emptied_health_costs_a_life_and_refills() {
    let mut p = Player::new(VP);
    let mut fb = Feedback::default();
    p.health = 1;
    damage_player(&mut p, 1, &mut fb);
    assert_eq!(p.lives, 1);
    assert_eq!(p.health, p.max_health);

    p.invulnerable_timer = 0;
    p.health = 1;
    damage_player(&mut p, 1, &mut fb);
    assert_eq!(p.lives, 0);
    assert_eq!(p.health, 0);
    assert!(p.is_dead());
}

#[test]
fn invulnerability_runs_out() {
    let mut p = Player::new(VP);
    let mut fb = Feedback::default();
    damage_player(&mut p, 1, &mut fb);
    for _ in 0..INVULNERABILITY_FRAMES {
        advance_player(&mut p, VP);
    }
    assert!(!p.is_invulnerable());
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[test]
fn shot_upgrades_are_exclusive() {
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::TripleShot);
    apply_powerup(&mut p, PowerupKind::PowerShot);
    assert!(!p.powerups.triple_shot());
    assert!(p.powerups.power_shot());
}

#[test]
fn shield_and_speed_are_exclusive() {
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::Shield);
    apply_powerup(&mut p, PowerupKind::TripleShot);
    apply_powerup(&mut p, PowerupKind::SpeedBoost);
    assert!(!p.powerups.shield());
    assert!(p.powerups.speed_boost());
    assert!(p.powerups.triple_shot());
    assert_eq!(p.powerups.speed_boost, POWERUP_DURATION);
}

#[test]
fn health_is_capped_and_lives_are_capped() {
    let mut p = Player::new(VP);
    p.health = 4;
    apply_powerup(&mut p, PowerupKind::Health);
    assert_eq!(p.health, 5);

    for _ in 0..10 {
        apply_powerup(&mut p, PowerupKind::ExtraLife);
    }
    assert_eq!(p.lives, PLAYER_MAX_LIVES);
}

#[test]
fn shield_expires_after_its_duration() {
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::Shield);
    assert!(p.is_invulnerable());
    for _ in 0..POWERUP_DURATION {
        advance_player(&mut p, VP);
    }
    assert!(!p.has_shield());
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn fire_respects_cooldown() {
    let mut rng = seeded_rng();
    let mut p = Player::new(VP);
    let shots = fire(&mut p, &mut rng);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].vel, Vec2::new(0.0, -PROJECTILE_SPEED));
    assert_eq!(shots[0].damage, 1);
    assert!(fire(&mut p, &mut rng).is_empty());
    assert_eq!(p.shoot_cooldown, SHOOT_COOLDOWN);
}

#[test]
fn triple_shot_fans_out() {
    let mut rng = seeded_rng();
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::TripleShot);
    let vels: Vec<Vec2> = fire(&mut p, &mut rng).iter().map(|s| s.vel).collect();
    assert_eq!(
        vels,
        vec![Vec2::new(0.0, -10.0), Vec2::new(-2.0, -9.0), Vec2::new(2.0, -9.0)]
    );
}

#[test]
fn power_shot_doubles_damage() {
    let mut rng = seeded_rng();
    let mut p = Player::new(VP);
    apply_powerup(&mut p, PowerupKind::PowerShot);
    assert!(fire(&mut p, &mut rng).iter().all(|s| s.damage == 2));
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn enemy_kinds_scale_with_level() {
    let mut rng = seeded_rng();
    let expected = [
        (EnemyKind::Basic, 1, 200),
        (EnemyKind::Shooter, 2, 300),
        (EnemyKind::Bomber, 3, 400),
        (EnemyKind::Zigzag, 1, 240),
    ];
    for (kind, health, score) in expected {
        let e = Enemy::new(kind, Vec2::new(100.0, 100.0), 2, VP, &mut rng);
        assert_eq!(e.kind(), kind);
        assert_eq!(e.health, health);
        assert_eq!(e.score_value, score);
        assert!((e.hitbox_radius - e.size / 2.0).abs() < 1e-6);
        assert!((60..120).contains(&e.behavior_duration));
    }
}

#[test]
fn take_hit_reports_only_the_killing_blow() {
    let mut rng = seeded_rng();
    let mut bomber = Enemy::new(EnemyKind::Bomber, Vec2::ZERO, 1, VP, &mut rng);
    assert!(!bomber.take_hit(1));
    assert!(!bomber.take_hit(1));
    assert_eq!(bomber.health, 1);
    assert!(bomber.take_hit(1));
    assert!(!bomber.take_hit(1));
}

#[test]
fn shooter_fires_at_a_nearby_player() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(EnemyKind::Shooter, Vec2::new(400.0, 200.0), 1, VP, &mut rng);
    let env = surroundings(Vec2::new(400.0, 450.0));

    let spawns = advance_enemy(&mut e, &env, &mut rng);
    let shot = spawns.iter().find_map(|s| match s {
        Spawn::EnemyShot(shot) => Some(shot.clone()),
        _ => None,
    });
    let shot = shot.expect("shooter should fire on its first frame");
    assert!((shot.vel.mag() - ENEMY_PROJECTILE_SPEED).abs() < 1e-4);
    assert!(shot.vel.y > 0.0);
    assert_eq!(shot.color, EnemyKind::Shooter.color());

    // Cooling down now.
    let again = advance_enemy(&mut e, &env, &mut rng);
    assert!(!again.iter().any(|s| matches!(s, Spawn::EnemyShot(_))));
}

#[test]
fn shooter_holds_fire_out_of_range() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(EnemyKind::Shooter, Vec2::new(50.0, 50.0), 1, VP, &mut rng);
    let env = surroundings(Vec2::new(750.0, 550.0));
    let spawns = advance_enemy(&mut e, &env, &mut rng);
    assert!(spawns.is_empty());
}

#[test]
fn enemies_respect_their_speed_limit() {
    let mut rng = seeded_rng();
    for kind in EnemyKind::ALL {
        let mut e = Enemy::new(kind, Vec2::new(400.0, 100.0), 3, VP, &mut rng);
        let env = surroundings(Vec2::new(400.0, 500.0));
        for _ in 0..300 {
            advance_enemy(&mut e, &env, &mut rng);
            assert!(e.vel.mag() <= e.max_speed + 1e-4, "{kind:?} too fast");
        }
    }
}

#[test]
fn bomber_closes_in_on_the_player() {
    let mut rng = seeded_rng();
    let player = Vec2::new(400.0, 500.0);
    let mut e = Enemy::new(EnemyKind::Bomber, Vec2::new(400.0, 100.0), 1, VP, &mut rng);
    let start = e.pos.dist(player);
    for _ in 0..120 {
        advance_enemy(&mut e, &surroundings(player), &mut rng);
    }
    assert!(e.pos.dist(player) < start);
}

#[test]
fn shooter_cooldown_shortens_with_level() {
    let mut rng = seeded_rng();
    for (level, lo, hi) in [(1, 90, 120), (3, 30, 40), (10, 9, 12)] {
        for _ in 0..20 {
            let e = Enemy::new(EnemyKind::Shooter, Vec2::ZERO, level, VP, &mut rng);
            match e.behavior {
                Behavior::Shooter { cooldown, cooldown_max, .. } => {
                    assert_eq!(cooldown, 0);
                    assert!((lo..=hi).contains(&cooldown_max), "level {level}: {cooldown_max}");
                }
                other => panic!("unexpected behaviour {other:?}"),
            }
        }
    }
}

/// Shooter one frame after spawning at `y`, straight above a player at 500.
fn shooter_step(y: f32, anim_offset: f32) -> Enemy {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(EnemyKind::Shooter, Vec2::new(400.0, y), 1, VP, &mut rng);
    e.anim_offset = anim_offset;
    advance_enemy(&mut e, &surroundings(Vec2::new(400.0, 500.0)), &mut rng);
    e
}

#[test]
fn shooter_backs_off_when_too_close() {
    let e = shooter_step(400.0, 0.0);
    assert!(e.vel.x.abs() < 1e-6);
    assert!((e.vel.y + 0.2).abs() < 1e-6);
}

#[test]
fn shooter_approaches_when_too_far() {
    let e = shooter_step(100.0, 0.0);
    assert!(e.vel.x.abs() < 1e-6);
    assert!((e.vel.y - 0.1).abs() < 1e-6);
}

#[test]
fn shooter_strafes_at_its_preferred_distance() {
    // Frame 10: sin(0.3 + 1.0) drives the sideways drift.
    let e = shooter_step(250.0, 1.0);
    assert!(e.vel.y.abs() < 1e-6);
    let expected = -(1.3f32).sin() * 0.2;
    assert!((e.vel.x - expected).abs() < 1e-5, "{:?}", e.vel);

    let flipped = shooter_step(250.0, 1.0 + std::f32::consts::PI);
    assert!(flipped.vel.x > 0.0);
}

#[test]
fn basic_heads_for_its_target_with_a_sideways_wobble() {
    let mut rng = seeded_rng();
    let env = surroundings(Vec2::new(700.0, 500.0));

    // Wobble phase 0.02 * 10 + o = 0 leaves the pull alone.
    let mut e = Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), 1, VP, &mut rng);
    e.behavior.set_target(Vec2::new(100.0, 400.0));
    e.anim_offset = -0.2;
    advance_enemy(&mut e, &env, &mut rng);
    assert!(e.vel.x.abs() < 1e-6);
    assert!((e.vel.y - 0.2).abs() < 1e-6);

    // At a wobble peak only x moves.
    let mut e = Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), 1, VP, &mut rng);
    e.behavior.set_target(Vec2::new(100.0, 400.0));
    e.anim_offset = std::f32::consts::FRAC_PI_2 - 0.2;
    advance_enemy(&mut e, &env, &mut rng);
    assert!((e.vel.x - 0.05).abs() < 1e-5);
    assert!((e.vel.y - 0.2).abs() < 1e-6);
}

#[test]
fn zigzag_weaves_on_both_axes() {
    let mut rng = seeded_rng();
    let env = surroundings(Vec2::new(400.0, 500.0));

    let mut e = Enemy::new(EnemyKind::Zigzag, Vec2::new(400.0, 100.0), 1, VP, &mut rng);
    e.anim_offset = 0.0;
    advance_enemy(&mut e, &env, &mut rng);
    // Frame 10: x gets sin(1.0) * 0.5, y gets 0.15 + cos(0.8) * 0.5.
    assert!((e.vel.x - (1.0f32).sin() * 0.5).abs() < 1e-5, "{:?}", e.vel);
    assert!((e.vel.y - (0.15 + (0.8f32).cos() * 0.5)).abs() < 1e-5, "{:?}", e.vel);

    let mut e = Enemy::new(EnemyKind::Zigzag, Vec2::new(400.0, 100.0), 1, VP, &mut rng);
    e.anim_offset = std::f32::consts::PI;
    advance_enemy(&mut e, &env, &mut rng);
    assert!(e.vel.x < 0.0);
}

/// Run one frame with the behaviour timer about to expire.
fn force_retarget(kind: EnemyKind, player: Vec2, rng: &mut StdRng) -> Enemy {
    let mut e = Enemy::new(kind, Vec2::new(400.0, 100.0), 1, VP, rng);
    e.behavior_timer = e.behavior_duration - 1;
    advance_enemy(&mut e, &surroundings(player), rng);
    assert_eq!(e.behavior_timer, 0);
    assert!((60..120).contains(&e.behavior_duration));
    e
}

#[test]
fn retarget_picks_kind_specific_targets() {
    let mut rng = seeded_rng();
    let player = Vec2::new(250.0, 450.0);
    for _ in 0..30 {
        let t = force_retarget(EnemyKind::Basic, player, &mut rng).behavior.target();
        assert!((80.0..=720.0).contains(&t.x) && (60.0..=420.0).contains(&t.y), "{t:?}");

        let t = force_retarget(EnemyKind::Shooter, player, &mut rng).behavior.target();
        assert!((160.0..=640.0).contains(&t.x) && (120.0..=300.0).contains(&t.y), "{t:?}");

        let t = force_retarget(EnemyKind::Bomber, player, &mut rng).behavior.target();
        assert_eq!(t, player);

        let t = force_retarget(EnemyKind::Zigzag, player, &mut rng).behavior.target();
        assert!((t.x - player.x).abs() <= 200.0 && (t.y - player.y).abs() <= 200.0, "{t:?}");
    }
}

#[test]
fn behaviour_timer_runs_until_its_duration() {
    let mut rng = seeded_rng();
    let mut e = Enemy::new(EnemyKind::Basic, Vec2::new(400.0, 100.0), 1, VP, &mut rng);
    let target = e.behavior.target();
    advance_enemy(&mut e, &surroundings(Vec2::new(400.0, 500.0)), &mut rng);
    assert_eq!(e.behavior_timer, 1);
    assert_eq!(e.behavior.target(), target);
}

// ── Cosmetics ─────────────────────────────────────────────────────────────────

#[test]
fn particles_fade_and_die() {
    let mut rng = seeded_rng();
    let mut p = Particle::burst(Vec2::ZERO, 10.0, None, &mut rng);
    let first_size = p.size();
    for _ in 0..10 {
        advance_particle(&mut p, &mut rng);
    }
    assert!(p.size() < first_size);
    assert!(p.alpha() < 255);
    for _ in 0..100 {
        advance_particle(&mut p, &mut rng);
    }
    assert!(p.is_dead());
}

#[test]
fn spark_trail_is_bounded() {
    let mut rng = seeded_rng();
    let mut s = Particle::spark(Vec2::ZERO, 0.0, 1.0, 3.0, Rgb(1, 2, 3), &mut rng);
    for _ in 0..20 {
        advance_particle(&mut s, &mut rng);
    }
    assert_eq!(s.trail.len(), 5);
}

#[test]
fn powerups_emit_hover_sparks() {
    let mut rng = seeded_rng();
    let mut pu = Powerup::new(Vec2::new(100.0, 100.0), PowerupKind::Shield, &mut rng);
    let sparks: usize = (0..33)
        .map(|f| advance_powerup(&mut pu, f, &mut rng).len())
        .sum();
    assert_eq!(sparks, 3);
    assert!(pu.vel.mag() <= 3.1);
}

#[test]
fn stars_wrap_to_the_top() {
    let mut rng = seeded_rng();
    let mut star = Star::random(VP, &mut rng);
    star.pos.y = VP.height - 0.01;
    advance_star(&mut star, VP, &mut rng);
    assert_eq!(star.pos.y, 0.0);
}
