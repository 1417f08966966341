//! Circle hit tests and the combat rules that run on every hit.
//!
//! Each resolver walks its collection back to front so removing the current
//! element never skips the next one.

use rand::Rng;

use crate::behavior::{apply_powerup, damage_player};
use crate::entities::{Body, Enemy, Powerup, Rgb};
use crate::feedback::Cue;
use crate::session::GameSession;
use crate::spawn::{pick_powerup_kind, POWERUP_DROP_CHANCE};

/// Extra leniency for anything touching the player.
pub const PLAYER_CONTACT_BUFFER: f32 = 5.0;
const SHIELD_KNOCKBACK: f32 = 4.0;
const SHIELD_COLOR: Rgb = Rgb(100, 150, 255);
const PICKUP_COLOR: Rgb = Rgb(100, 255, 100);

fn is_valid(body: &impl Body) -> bool {
    let r = body.hitbox_radius();
    body.pos().is_finite() && r.is_finite() && r > 0.0
}

/// True when the two circles overlap, with `buffer` added to the radii.
/// A body with an unusable position or hitbox never collides.
pub fn collides(a: &impl Body, b: &impl Body, buffer: f32) -> bool {
    if !is_valid(a) || !is_valid(b) {
        log::warn!(
            "collision check skipped: invalid body (pos {:?} r {}, pos {:?} r {})",
            a.pos(),
            a.hitbox_radius(),
            b.pos(),
            b.hitbox_radius()
        );
        return false;
    }
    a.pos().dist(b.pos()) < a.hitbox_radius() + b.hitbox_radius() + buffer
}

/// Score, debris, maybe a powerup, shake and sound for a destroyed enemy.
fn enemy_destroyed(session: &mut GameSession, enemy: &Enemy, rng: &mut impl Rng) {
    session.score += enemy.score_value;
    session.explode(enemy.pos, 15, enemy.size * 1.5, None, rng);
    if rng.gen_bool(POWERUP_DROP_CHANCE) {
        let kind = pick_powerup_kind(session.level, rng);
        session.powerups.push(Powerup::new(enemy.pos, kind, rng));
    }
    session.feedback.shake.apply(5.0, 5);
    session.feedback.cue(Cue::Explosion);
    log::trace!("{:?} destroyed, +{}", enemy.kind(), enemy.score_value);
}

/// Enemy shots against the player.
pub fn resolve_enemy_shots(session: &mut GameSession, rng: &mut impl Rng) {
    for i in (0..session.enemy_projectiles.len()).rev() {
        let shot = &session.enemy_projectiles[i];
        if session.player.is_invulnerable()
            || !collides(shot, &session.player, PLAYER_CONTACT_BUFFER)
        {
            continue;
        }
        let shot = session.enemy_projectiles.remove(i);
        damage_player(&mut session.player, shot.damage, &mut session.feedback);
        session.explode(shot.pos, 5, shot.size, None, rng);
    }
}

/// Enemies ramming the player.  A shield turns the damage back on the enemy.
pub fn resolve_enemy_contact(session: &mut GameSession, rng: &mut impl Rng) {
    for i in (0..session.enemies.len()).rev() {
        if !collides(&session.enemies[i], &session.player, PLAYER_CONTACT_BUFFER) {
            continue;
        }
        if session.player.has_shield() {
            let player_pos = session.player.pos;
            let enemy = &mut session.enemies[i];
            let killed = enemy.take_hit(1);
            let away = enemy.pos.sub(player_pos).normalize();
            enemy.vel = away.scale(SHIELD_KNOCKBACK);
            let impact = player_pos.add(away.scale(session.player.size));
            session.explode(impact, 8, 8.0, Some(SHIELD_COLOR), rng);
            if killed {
                let enemy = session.enemies.remove(i);
                enemy_destroyed(session, &enemy, rng);
            }
        } else if !session.player.is_invulnerable() {
            let enemy = session.enemies.remove(i);
            damage_player(&mut session.player, 1, &mut session.feedback);
            session.explode(enemy.pos, 10, enemy.size, None, rng);
            session.feedback.shake.apply(10.0, 10);
            session.feedback.cue(Cue::Explosion);
        }
    }
}

/// Player shots against enemies.  Each enemy takes at most one shot per frame.
pub fn resolve_player_shots(session: &mut GameSession, rng: &mut impl Rng) {
    for i in (0..session.enemies.len()).rev() {
        let hit = (0..session.projectiles.len())
            .rev()
            .find(|&j| collides(&session.projectiles[j], &session.enemies[i], 0.0));
        let Some(j) = hit else { continue };

        let shot = session.projectiles.remove(j);
        let killed = session.enemies[i].take_hit(shot.damage);
        session.explode(shot.pos, 3, shot.size, None, rng);
        if killed {
            let enemy = session.enemies.remove(i);
            enemy_destroyed(session, &enemy, rng);
        }
    }
}

/// Powerups touching the player.
pub fn resolve_pickups(session: &mut GameSession, rng: &mut impl Rng) {
    for i in (0..session.powerups.len()).rev() {
        if !collides(&session.powerups[i], &session.player, 0.0) {
            continue;
        }
        let powerup = session.powerups.remove(i);
        apply_powerup(&mut session.player, powerup.kind);
        session.explode(powerup.pos, 10, powerup.size, Some(PICKUP_COLOR), rng);
        session.feedback.cue(Cue::Powerup);
        session.feedback.show_message(powerup.kind.message());
        log::debug!("picked up {:?}", powerup.kind);
    }
}

/// Drop everything that has left the playfield.  No side effects.
pub fn cull_offscreen(session: &mut GameSession) {
    let vp = session.viewport;
    session.projectiles.retain(|p| !p.is_offscreen(vp));
    session.enemy_projectiles.retain(|p| !p.is_offscreen(vp));
    session.enemies.retain(|e| !e.is_offscreen(vp));
    session.powerups.retain(|p| !p.is_offscreen(vp));
    session.particles.retain(|p| !p.is_dead());
}
