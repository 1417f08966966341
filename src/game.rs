//! Screen flow.  `Game` owns the session, the high-score table and the UI
//! flags each screen reads, and turns input events into actions.

use rand::Rng;

use crate::compute::{advance_stars, player_shoot, tick, TickOutcome};
use crate::entities::{MoveIntent, Viewport};
use crate::feedback::Cue;
use crate::highscore::{is_name_char, HighScoreTable, ScoreStore, DEFAULT_NAME, MAX_NAME_LEN};
use crate::input::{button_at, direction_of, ButtonId, Direction, InputEvent, Key};
use crate::session::GameSession;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Start,
    Playing,
    Paused,
    GameOver,
    Help,
    NameEntry,
}

/// Which set of screens is in use.  `Classic` has no help screen and no
/// name entry; qualifying scores are filed under the default name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Full,
    Classic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    TogglePause,
    Resume,
    OpenHelp,
    PlayAgain,
    ToggleHighScores,
    Shoot,
    Move(Direction, bool),
    NameChar(char),
    NameBackspace,
    SubmitName,
    Quit,
}

/// Flags the screens read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub show_high_scores: bool,
    pub pointer: Vec2,
    pub hovered: Option<ButtonId>,
    /// Rank the last finished match reached in the table, if any.
    pub last_rank: Option<usize>,
    pub final_score: u32,
}

pub struct Game {
    mode: GameMode,
    flow: Flow,
    session: GameSession,
    table: HighScoreTable,
    store: Box<dyn ScoreStore>,
    ui: UiState,
    name: String,
    quit: bool,
}

impl Game {
    /// Start on the title screen with the table loaded from `store`.
    pub fn new(
        viewport: Viewport,
        flow: Flow,
        store: Box<dyn ScoreStore>,
        rng: &mut impl Rng,
    ) -> Self {
        let table = HighScoreTable::load_or_empty(store.as_ref());
        Self {
            mode: GameMode::Start,
            flow,
            session: GameSession::new(viewport, rng),
            table,
            store,
            ui: UiState::default(),
            name: String::new(),
            quit: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access to the running session, for callers that stage or
    /// steer the simulation themselves.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.table
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Name typed so far on the name-entry screen.
    pub fn name_input(&self) -> &str {
        &self.name
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Sound requests raised since the last call.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        self.session.feedback.drain_cues()
    }

    // ── Frame update ──────────────────────────────────────────────────────────

    /// One frame.  Only `Playing` simulates; every screen scrolls the stars
    /// and runs down shake and message timers.
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.session.feedback.tick();
        if self.mode != GameMode::Playing {
            advance_stars(&mut self.session, rng);
            return;
        }
        if tick(&mut self.session, rng) == TickOutcome::PlayerDefeated {
            self.end_match();
        }
    }

    fn end_match(&mut self) {
        let score = self.session.score;
        self.ui.final_score = score;
        self.ui.last_rank = None;
        self.clear_intent();

        if !self.table.qualifies(score) {
            self.set_mode(GameMode::GameOver);
            return;
        }
        match self.flow {
            Flow::Full => {
                self.name.clear();
                self.set_mode(GameMode::NameEntry);
            }
            Flow::Classic => {
                self.save_score(DEFAULT_NAME);
                self.set_mode(GameMode::GameOver);
            }
        }
    }

    fn save_score(&mut self, name: &str) {
        let (score, level) = (self.session.score, self.session.level);
        match self.table.record(self.store.as_mut(), name, score, level) {
            Ok(rank) => self.ui.last_rank = rank,
            Err(e) => {
                log::warn!("could not save high score: {e}");
                self.ui.last_rank = self
                    .table
                    .entries()
                    .iter()
                    .position(|entry| entry.score == score);
            }
        }
    }

    fn set_mode(&mut self, to: GameMode) {
        if self.mode != to {
            log::debug!("mode {:?} -> {:?}", self.mode, to);
        }
        self.mode = to;
        self.ui.hovered = None;
    }

    fn clear_intent(&mut self) {
        self.session.player.intent = MoveIntent::default();
    }

    fn begin_match(&mut self) {
        self.session.reset();
        self.ui.show_high_scores = false;
        self.ui.last_rank = None;
        self.set_mode(GameMode::Playing);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Feed one input event.  Pointer motion and resizes are absorbed here;
    /// everything else goes through [`Game::action_for`] and [`Game::perform`].
    pub fn handle(&mut self, event: InputEvent, rng: &mut impl Rng) {
        match event {
            InputEvent::PointerMove(at) => {
                self.ui.pointer = at;
                self.ui.hovered = button_at(self.mode, self.flow, self.session.viewport, at);
            }
            InputEvent::Resize(viewport) => self.session.resize(viewport),
            other => {
                if let Some(action) = self.action_for(other) {
                    self.perform(action, rng);
                }
            }
        }
    }

    /// What `event` means in the current mode.
    pub fn action_for(&self, event: InputEvent) -> Option<Action> {
        use GameMode::*;

        match (self.mode, event) {
            (_, InputEvent::Interrupt) => Some(Action::Quit),

            (mode, InputEvent::PointerPress(at)) => {
                match button_at(mode, self.flow, self.session.viewport, at) {
                    Some(id) => Some(button_action(id)),
                    None if mode == Playing => Some(Action::Shoot),
                    None => None,
                }
            }

            (NameEntry, InputEvent::Typed(c)) => Some(Action::NameChar(c)),
            (NameEntry, InputEvent::KeyDown(Key::Backspace)) => Some(Action::NameBackspace),
            (NameEntry, InputEvent::KeyDown(Key::Enter)) => Some(Action::SubmitName),
            (NameEntry, _) => None,

            (Playing, InputEvent::KeyDown(key)) | (Playing, InputEvent::KeyUp(key))
                if direction_of(key).is_some() =>
            {
                let held = matches!(event, InputEvent::KeyDown(_));
                direction_of(key).map(|dir| Action::Move(dir, held))
            }

            (_, InputEvent::KeyDown(key)) => self.key_action(key),
            _ => None,
        }
    }

    fn key_action(&self, key: Key) -> Option<Action> {
        use GameMode::*;

        match (self.mode, key) {
            (_, Key::Char('q')) | (_, Key::Char('Q')) => Some(Action::Quit),
            (Playing, Key::Space) => Some(Action::Shoot),
            (Playing, Key::Escape) | (Paused, Key::Escape) => Some(Action::TogglePause),
            (Playing, Key::Char('h')) | (Playing, Key::Char('H')) => Some(Action::OpenHelp),
            (Help, Key::Char('h')) | (Help, Key::Char('H')) | (Help, Key::Escape) => {
                Some(Action::Resume)
            }
            (Paused, Key::Enter) | (Help, Key::Enter) => Some(Action::Resume),
            (Start, Key::Enter) | (Start, Key::Space) => Some(Action::Start),
            (GameOver, Key::Enter) | (GameOver, Key::Char('r')) | (GameOver, Key::Char('R')) => {
                Some(Action::PlayAgain)
            }
            (Start, Key::Char('t'))
            | (Start, Key::Char('T'))
            | (GameOver, Key::Char('t'))
            | (GameOver, Key::Char('T')) => Some(Action::ToggleHighScores),
            _ => None,
        }
    }

    /// Carry out `action` if it means something in the current mode.
    pub fn perform(&mut self, action: Action, rng: &mut impl Rng) {
        use GameMode::*;

        match (self.mode, action) {
            (_, Action::Quit) => self.quit = true,
            (Start, Action::Start) | (GameOver, Action::PlayAgain) => self.begin_match(),
            (Playing, Action::TogglePause) => {
                self.clear_intent();
                self.set_mode(Paused);
            }
            (Paused, Action::TogglePause) | (Paused, Action::Resume) | (Help, Action::Resume) => {
                self.set_mode(Playing)
            }
            (Playing, Action::OpenHelp) if self.flow == Flow::Full => {
                self.clear_intent();
                self.set_mode(Help);
            }
            (Start, Action::ToggleHighScores) | (GameOver, Action::ToggleHighScores) => {
                self.ui.show_high_scores = !self.ui.show_high_scores
            }
            (Playing, Action::Shoot) => {
                player_shoot(&mut self.session, rng);
            }
            (Playing, Action::Move(dir, held)) => {
                let intent = &mut self.session.player.intent;
                match dir {
                    Direction::Up => intent.up = held,
                    Direction::Down => intent.down = held,
                    Direction::Left => intent.left = held,
                    Direction::Right => intent.right = held,
                }
            }
            (NameEntry, Action::NameChar(c)) => {
                if is_name_char(c) && self.name.chars().count() < MAX_NAME_LEN {
                    self.name.push(c);
                }
            }
            (NameEntry, Action::NameBackspace) => {
                self.name.pop();
            }
            (NameEntry, Action::SubmitName) => {
                let name = std::mem::take(&mut self.name);
                self.save_score(&name);
                self.set_mode(GameOver);
            }
            (mode, action) => log::trace!("{action:?} ignored in {mode:?}"),
        }
    }
}

fn button_action(id: ButtonId) -> Action {
    match id {
        ButtonId::Start => Action::Start,
        ButtonId::Resume => Action::Resume,
        ButtonId::PlayAgain => Action::PlayAgain,
        ButtonId::HighScores => Action::ToggleHighScores,
        ButtonId::Help => Action::OpenHelp,
        ButtonId::Submit => Action::SubmitName,
    }
}
