//! Input vocabulary the core understands, and the on-screen buttons it
//! hit-tests pointer positions against.

use crate::entities::Viewport;
use crate::game::{Flow, GameMode};
use crate::vector::Vec2;

/// Keys the game reacts to.  Printable text arrives as `Typed` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Backspace,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A printable character, used only by name entry.
    Typed(char),
    PointerMove(Vec2),
    PointerPress(Vec2),
    Resize(Viewport),
    /// Ctrl-C or window close.
    Interrupt,
}

/// Which way a movement key pushes the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Arrow keys and WASD (either case).
pub fn direction_of(key: Key) -> Option<Direction> {
    match key {
        Key::Up | Key::Char('w') | Key::Char('W') => Some(Direction::Up),
        Key::Down | Key::Char('s') | Key::Char('S') => Some(Direction::Down),
        Key::Left | Key::Char('a') | Key::Char('A') => Some(Direction::Left),
        Key::Right | Key::Char('d') | Key::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

// ── Buttons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    Resume,
    PlayAgain,
    HighScores,
    Help,
    Submit,
}

impl ButtonId {
    pub fn label(self) -> &'static str {
        match self {
            ButtonId::Start => "START GAME",
            ButtonId::Resume => "RESUME",
            ButtonId::PlayAgain => "PLAY AGAIN",
            ButtonId::HighScores => "HIGH SCORES",
            ButtonId::Help => "?",
            ButtonId::Submit => "SUBMIT",
        }
    }
}

/// Axis-aligned rectangle given by its centre and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Button {
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() < self.width / 2.0
            && (point.y - self.center.y).abs() < self.height / 2.0
    }
}

const BUTTON_W: f32 = 200.0;
const BUTTON_H: f32 = 50.0;
const BUTTON_GAP: f32 = 20.0;
const HELP_BUTTON_SIZE: f32 = 40.0;
/// Height reserved for the HUD row at the top of the playfield.
pub const HUD_HEIGHT: f32 = 60.0;

/// The buttons shown in `mode`, primary first.
pub fn buttons_for(mode: GameMode, flow: Flow, viewport: Viewport) -> Vec<Button> {
    let primary = Vec2::new(viewport.width / 2.0, viewport.height * 2.0 / 3.0);
    let below = primary.add(Vec2::new(0.0, BUTTON_H + BUTTON_GAP));
    let wide = |id: ButtonId, center: Vec2| Button { id, center, width: BUTTON_W, height: BUTTON_H };

    match mode {
        GameMode::Start => vec![
            wide(ButtonId::Start, primary),
            wide(ButtonId::HighScores, below),
        ],
        GameMode::Playing if flow == Flow::Full => vec![Button {
            id: ButtonId::Help,
            center: Vec2::new(
                viewport.width - HELP_BUTTON_SIZE,
                HUD_HEIGHT + HELP_BUTTON_SIZE / 2.0,
            ),
            width: HELP_BUTTON_SIZE,
            height: HELP_BUTTON_SIZE,
        }],
        GameMode::Playing => Vec::new(),
        GameMode::Paused | GameMode::Help => vec![wide(ButtonId::Resume, primary)],
        GameMode::GameOver => vec![
            wide(ButtonId::PlayAgain, primary),
            wide(ButtonId::HighScores, below),
        ],
        GameMode::NameEntry => vec![wide(ButtonId::Submit, primary)],
    }
}

/// First button of `mode` under `point`.
pub fn button_at(mode: GameMode, flow: Flow, viewport: Viewport, point: Vec2) -> Option<ButtonId> {
    buttons_for(mode, flow, viewport)
        .into_iter()
        .find(|b| b.contains(point))
        .map(|b| b.id)
}
