//! Rendering layer.  All terminal output lives here.
//!
//! Every function takes a writer, the cell grid and an immutable view of the
//! game.  Nothing here changes game state; logical pixels are mapped to
//! terminal cells through [`Screen`].

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};
use space_potato::entities::{Enemy, EnemyKind, Player, Powerup, PowerupKind, Rgb, Viewport};
use space_potato::game::{Flow, Game, GameMode};
use space_potato::highscore::HighScoreTable;
use space_potato::input::{buttons_for, Button, HUD_HEIGHT};
use space_potato::vector::Vec2;

/// Logical pixels per terminal cell.
pub const CELL_W: f32 = 8.0;
pub const CELL_H: f32 = 16.0;

const C_HUD: Color = Color::Yellow;
const C_LIVES: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_SHOT: Color = Color::Cyan;
const C_POWER_SHOT: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Rgb { r: 100, g: 150, b: 255 };
const C_DEBRIS: Color = Color::Rgb { r: 255, g: 150, b: 50 };
const C_BUTTON: Color = Color::White;
const C_BUTTON_HOVER: Color = Color::Black;

/// Mapping between the terminal grid and the logical playfield.  The
/// playfield is centred when the terminal is larger than the capped viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub cols: u16,
    pub rows: u16,
    pub viewport: Viewport,
    origin_col: u16,
    origin_row: u16,
}

impl Screen {
    pub fn new(cols: u16, rows: u16, max_width: f32, max_height: f32) -> Self {
        let width = (cols as f32 * CELL_W).min(max_width);
        let height = (rows as f32 * CELL_H).min(max_height);
        let used_cols = (width / CELL_W) as u16;
        let used_rows = (height / CELL_H) as u16;
        Self {
            cols,
            rows,
            viewport: Viewport::new(width, height),
            origin_col: cols.saturating_sub(used_cols) / 2,
            origin_row: rows.saturating_sub(used_rows) / 2,
        }
    }

    /// Cell under logical `pos`, if it is on screen.
    pub fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let col = self.origin_col as f32 + pos.x / CELL_W;
        let row = self.origin_row as f32 + pos.y / CELL_H;
        if col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Centre of the cell at (`col`, `row`) in logical pixels.
    pub fn to_logical(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 - self.origin_col as f32 + 0.5) * CELL_W,
            (row as f32 - self.origin_row as f32 + 0.5) * CELL_H,
        )
    }

    fn play_row(&self, logical_y: f32) -> u16 {
        self.origin_row + (logical_y / CELL_H) as u16
    }

    fn center_col(&self) -> u16 {
        self.origin_col + (self.viewport.width / CELL_W / 2.0) as u16
    }
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let session = game.session();
    let shake = if game.mode() == GameMode::Playing {
        let (dx, dy) = session.feedback.shake.offset(session.frame);
        Vec2::new(dx, dy)
    } else {
        Vec2::ZERO
    };

    draw_world(out, screen, game, shake)?;

    match game.mode() {
        GameMode::Start => draw_start(out, screen, game)?,
        GameMode::Playing => {
            draw_hud(out, screen, game)?;
            draw_messages(out, screen, game)?;
        }
        GameMode::Paused => {
            draw_hud(out, screen, game)?;
            draw_title(out, screen, "PAUSED", 3.0)?;
            draw_centered(out, screen, screen.viewport.height / 2.0, "ESC or ENTER to resume", C_HINT)?;
        }
        GameMode::Help => {
            draw_hud(out, screen, game)?;
            draw_help(out, screen)?;
        }
        GameMode::GameOver => draw_game_over(out, screen, game)?,
        GameMode::NameEntry => draw_name_entry(out, screen, game)?,
    }
    draw_buttons(out, screen, game)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    screen: &Screen,
    pos: Vec2,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    // Centre the glyph run on `pos`.
    let half = text.chars().count() as f32 * CELL_W / 2.0;
    if let Some((col, row)) = screen.cell(Vec2::new(pos.x - half + CELL_W / 2.0, pos.y)) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    screen: &Screen,
    logical_y: f32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let row = screen.play_row(logical_y);
    let col = screen
        .center_col()
        .saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, screen: &Screen, text: &str, at: f32) -> std::io::Result<()> {
    out.queue(style::SetAttribute(Attribute::Bold))?;
    draw_centered(out, screen, screen.viewport.height / at, text, C_TITLE)?;
    out.queue(style::SetAttribute(Attribute::Reset))?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_world<W: Write>(
    out: &mut W,
    screen: &Screen,
    game: &Game,
    shake: Vec2,
) -> std::io::Result<()> {
    let session = game.session();

    for star in &session.stars {
        let glyph = if star.size > 2.0 { "+" } else { "." };
        put(out, screen, star.pos, glyph, Color::DarkGrey)?;
    }
    if game.mode() == GameMode::Start {
        return Ok(());
    }

    for particle in &session.particles {
        if particle.alpha() < 40 {
            continue;
        }
        let glyph = if particle.size() > 4.0 { "*" } else { "·" };
        let color = particle.color.map(rgb).unwrap_or(C_DEBRIS);
        put(out, screen, particle.pos.add(shake), glyph, color)?;
    }
    for powerup in &session.powerups {
        draw_powerup(out, screen, powerup, shake)?;
    }
    for enemy in &session.enemies {
        draw_enemy(out, screen, enemy, shake)?;
    }
    for shot in &session.enemy_projectiles {
        put(out, screen, shot.pos.add(shake), "•", rgb(shot.color))?;
    }
    for shot in &session.projectiles {
        let (glyph, color) = if shot.damage > 1 { ("┃", C_POWER_SHOT) } else { ("║", C_SHOT) };
        put(out, screen, shot.pos.add(shake), glyph, color)?;
    }
    if !session.player.is_dead() {
        draw_player(out, screen, &session.player, session.frame, shake)?;
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    screen: &Screen,
    player: &Player,
    frame: u64,
    shake: Vec2,
) -> std::io::Result<()> {
    // Blink while recovering from a hit.
    if player.invulnerable_timer > 0 && (frame / 5) % 2 == 0 {
        return Ok(());
    }
    let pos = player.pos.add(shake);
    let wing_y = pos.y + CELL_H;
    let body = if player.angle < -0.1 {
        "/█("
    } else if player.angle > 0.1 {
        ")█\\"
    } else {
        "/█\\"
    };
    put(out, screen, pos, "▲", C_PLAYER)?;
    put(out, screen, Vec2::new(pos.x, wing_y), body, C_PLAYER)?;
    if player.intent.up || player.intent.left || player.intent.right {
        let flame = if player.thrust_phase.sin() > 0.0 { "^" } else { "'" };
        put(out, screen, Vec2::new(pos.x, wing_y + CELL_H), flame, C_DEBRIS)?;
    }
    if player.has_shield() {
        put(out, screen, Vec2::new(pos.x, wing_y), "(   )", C_SHIELD)?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    screen: &Screen,
    enemy: &Enemy,
    shake: Vec2,
) -> std::io::Result<()> {
    let pos = enemy.pos.add(shake);
    let color = rgb(enemy.color);
    let (top, bottom) = match enemy.kind() {
        EnemyKind::Basic => ("«▼»", "╚═╝"),
        EnemyKind::Shooter => ("[◎]", "╰┬╯"),
        EnemyKind::Bomber => ("(███)", "╰───╯"),
        EnemyKind::Zigzag => {
            // Arrows point the way it is travelling; the spin flickers them.
            let rightward = enemy.vel.heading().cos() >= 0.0;
            let flicker = (enemy.rotation * 4.0).sin() > 0.0;
            match (rightward, flicker) {
                (true, true) => (">z>", ""),
                (true, false) => ("›z›", ""),
                (false, true) => ("<z<", ""),
                (false, false) => ("‹z‹", ""),
            }
        }
    };
    put(out, screen, pos, top, color)?;
    if !bottom.is_empty() {
        put(out, screen, Vec2::new(pos.x, pos.y + CELL_H), bottom, color)?;
    }
    Ok(())
}

fn powerup_glyph(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::TripleShot => "≡",
        PowerupKind::Shield => "◎",
        PowerupKind::SpeedBoost => "»",
        PowerupKind::Health => "+",
        PowerupKind::ExtraLife => "♥",
        PowerupKind::PowerShot => "✦",
    }
}

fn draw_powerup<W: Write>(
    out: &mut W,
    screen: &Screen,
    powerup: &Powerup,
    shake: Vec2,
) -> std::io::Result<()> {
    let glyph = powerup_glyph(powerup.kind);
    let framed = if powerup.pulse > 0.0 {
        format!("[{glyph}]")
    } else {
        format!("({glyph})")
    };
    put(out, screen, powerup.pos.add(shake), &framed, rgb(powerup.kind.color()))
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    let session = game.session();
    let player = &session.player;
    let top = screen.play_row(0.0);
    let left = screen.origin_col + 1;

    out.queue(cursor::MoveTo(left, top))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    let best = game.high_scores().best().max(session.score);
    out.queue(Print(format!(
        "Score:{:>7}  Hi:{:>7}  Level:{:>2}",
        session.score, best, session.level
    )))?;

    let filled = player.health.max(0) as usize;
    let empty = (player.max_health - player.health).max(0) as usize;
    out.queue(cursor::MoveTo(left, top + 1))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(format!("[{}{}]", "■".repeat(filled), "□".repeat(empty))))?;
    out.queue(style::SetForegroundColor(C_LIVES))?;
    out.queue(Print(format!(" {}", "♥".repeat(player.lives as usize))))?;

    let p = &player.powerups;
    let slots = [
        (p.triple_shot, PowerupKind::TripleShot, "TRIPLE"),
        (p.power_shot, PowerupKind::PowerShot, "POWER"),
        (p.shield, PowerupKind::Shield, "SHIELD"),
        (p.speed_boost, PowerupKind::SpeedBoost, "SPEED"),
    ];
    for (frames, kind, label) in slots.into_iter().filter(|(frames, ..)| *frames > 0) {
        out.queue(style::SetForegroundColor(rgb(kind.color())))?;
        out.queue(Print(format!("  {} {label} {}s", powerup_glyph(kind), frames / 60 + 1)))?;
    }

    let hint = match game.flow() {
        Flow::Full => "ARROWS/WASD move  SPACE shoot  ESC pause  H help  Q quit",
        Flow::Classic => "ARROWS/WASD move  SPACE shoot  ESC pause  Q quit",
    };
    let bottom = screen.play_row(screen.viewport.height - 1.0);
    out.queue(cursor::MoveTo(left, bottom))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

fn draw_messages<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    let feedback = &game.session().feedback;
    if let Some(banner) = &feedback.banner {
        out.queue(style::SetAttribute(Attribute::Bold))?;
        draw_centered(out, screen, screen.viewport.height / 3.0, &banner.text, C_TITLE)?;
        out.queue(style::SetAttribute(Attribute::Reset))?;
    }
    if let Some(message) = &feedback.message {
        let y = HUD_HEIGHT + 2.0 * CELL_H;
        draw_centered(out, screen, y, &message.text, Color::Green)?;
    }
    Ok(())
}

// ── Buttons ───────────────────────────────────────────────────────────────────

fn draw_button<W: Write>(
    out: &mut W,
    screen: &Screen,
    button: &Button,
    hovered: bool,
) -> std::io::Result<()> {
    let label = format!("[ {} ]", button.id.label());
    if hovered {
        out.queue(style::SetBackgroundColor(C_BUTTON))?;
        put(out, screen, button.center, &label, C_BUTTON_HOVER)?;
        out.queue(style::SetBackgroundColor(Color::Reset))?;
    } else {
        put(out, screen, button.center, &label, C_BUTTON)?;
    }
    Ok(())
}

fn draw_buttons<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    let session = game.session();
    for button in buttons_for(game.mode(), game.flow(), session.viewport) {
        let hovered = game.ui().hovered == Some(button.id);
        draw_button(out, screen, &button, hovered)?;
    }
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_start<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    draw_title(out, screen, "★  SPACE  POTATO  ★", 5.0)?;
    if game.ui().show_high_scores {
        return draw_high_scores(out, screen, game.high_scores(), None);
    }
    let h = screen.viewport.height;
    let best = game.high_scores().best();
    if best > 0 {
        draw_centered(out, screen, h / 5.0 + CELL_H, &format!("Best Score: {best}"), C_HUD)?;
    }
    let lines = [
        "Shoot the space invaders before they mash you.",
        "ENTER to start   T high scores   Q quit",
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_centered(out, screen, h / 3.0 + i as f32 * CELL_H * 2.0, line, C_HINT)?;
    }
    Ok(())
}

fn draw_help<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    draw_title(out, screen, "HOW TO PLAY", 8.0)?;
    let h = screen.viewport.height;
    let rows: [(&str, Color); 10] = [
        ("ARROWS / WASD   move", Color::White),
        ("SPACE / click   shoot", Color::White),
        ("ESC             pause", Color::White),
        ("H               close this help", Color::White),
        ("≡  triple shot   three-way fire", rgb(PowerupKind::TripleShot.color())),
        ("✦  power shot    double damage", rgb(PowerupKind::PowerShot.color())),
        ("◎  shield        rams hurt them, not you", rgb(PowerupKind::Shield.color())),
        ("»  speed boost   faster ship", rgb(PowerupKind::SpeedBoost.color())),
        ("+  health        restore health", rgb(PowerupKind::Health.color())),
        ("♥  extra life    one more ship", rgb(PowerupKind::ExtraLife.color())),
    ];
    for (i, (text, color)) in rows.iter().enumerate() {
        draw_centered(out, screen, h / 8.0 + (i as f32 + 2.0) * CELL_H, text, *color)?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    let ui = game.ui();
    let h = screen.viewport.height;
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let start = h / 6.0;
    for (i, (text, color)) in lines.iter().enumerate() {
        draw_centered(out, screen, start + i as f32 * CELL_H, text, *color)?;
    }
    let after_box = start + lines.len() as f32 * CELL_H;

    if ui.show_high_scores {
        return draw_high_scores(out, screen, game.high_scores(), ui.last_rank);
    }
    let score_line = format!("Final Score: {:>7}   Level {}", ui.final_score, game.session().level);
    draw_centered(out, screen, after_box + CELL_H, &score_line, C_HUD)?;
    match ui.last_rank {
        Some(0) => draw_centered(out, screen, after_box + 2.0 * CELL_H, "★ NEW HIGH SCORE ★", C_HUD)?,
        Some(rank) => {
            let text = format!("You placed #{} on the board", rank + 1);
            draw_centered(out, screen, after_box + 2.0 * CELL_H, &text, C_HUD)?
        }
        None => {}
    }
    draw_centered(out, screen, after_box + 4.0 * CELL_H, "ENTER play again   T high scores   Q quit", C_HINT)
}

fn draw_name_entry<W: Write>(out: &mut W, screen: &Screen, game: &Game) -> std::io::Result<()> {
    let h = screen.viewport.height;
    draw_title(out, screen, "NEW HIGH SCORE!", 5.0)?;
    let score_line = format!("Score: {}", game.ui().final_score);
    draw_centered(out, screen, h / 5.0 + 2.0 * CELL_H, &score_line, C_HUD)?;
    draw_centered(out, screen, h / 3.0, "Enter your name:", Color::White)?;

    let name = game.name_input();
    let caret = if (game.session().frame / 30) % 2 == 0 { "_" } else { " " };
    let field = format!("> {name}{caret} <");
    draw_centered(out, screen, h / 3.0 + 2.0 * CELL_H, &field, C_TITLE)?;
    draw_centered(out, screen, h / 3.0 + 4.0 * CELL_H, "ENTER to save", C_HINT)
}

fn draw_high_scores<W: Write>(
    out: &mut W,
    screen: &Screen,
    table: &HighScoreTable,
    highlight: Option<usize>,
) -> std::io::Result<()> {
    let top = screen.viewport.height / 5.0 + 2.0 * CELL_H;
    draw_centered(out, screen, top, "── HIGH SCORES ──", C_TITLE)?;
    if table.is_empty() {
        return draw_centered(out, screen, top + 2.0 * CELL_H, "No scores yet", C_HINT);
    }
    for (i, entry) in table.entries().iter().enumerate() {
        let line = format!("{:>2}. {:<12} {:>8}  L{:<2}", i + 1, entry.name, entry.score, entry.level);
        let color = if highlight == Some(i) { C_HUD } else { Color::White };
        draw_centered(out, screen, top + (i as f32 + 2.0) * CELL_H, &line, color)?;
    }
    Ok(())
}
