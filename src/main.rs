mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use display::Screen;
use space_potato::audio::{AudioSink, Fallible, Silent, TerminalBell};
use space_potato::config::Config;
use space_potato::game::{Flow, Game};
use space_potato::highscore::{JsonFileStore, MemoryStore, ScoreStore};
use space_potato::input::{direction_of, InputEvent, Key};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

// ── Held-key model ────────────────────────────────────────────────────────────

/// Frames a key stays held after its last press or repeat on terminals that
/// never report releases.  Shorter than the OS repeat interval.
const HOLD_WINDOW: u64 = 8;

/// Same, before the first repeat arrives.  Covers the OS repeat delay.
const FIRST_HOLD_WINDOW: u64 = 32;

#[derive(Clone, Copy)]
struct Held {
    pressed: u64,
    last_seen: u64,
}

/// Tracks movement keys so a release can be synthesised when the terminal
/// only reports presses.
#[derive(Default)]
struct HeldKeys {
    keys: HashMap<Key, Held>,
}

impl HeldKeys {
    fn press(&mut self, key: Key, frame: u64) {
        self.keys
            .entry(key)
            .and_modify(|h| h.last_seen = frame)
            .or_insert(Held { pressed: frame, last_seen: frame });
    }

    fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Keys whose hold window ran out at `frame`; they are forgotten.
    fn expire(&mut self, frame: u64) -> Vec<Key> {
        let stale: Vec<Key> = self
            .keys
            .iter()
            .filter(|(_, h)| {
                let window = if h.last_seen == h.pressed { FIRST_HOLD_WINDOW } else { HOLD_WINDOW };
                frame.saturating_sub(h.last_seen) > window
            })
            .map(|(&key, _)| key)
            .collect();
        for key in &stale {
            self.keys.remove(key);
        }
        stale
    }
}

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "space_potato", version, about = "Arcade space shooter for the terminal")]
struct Args {
    /// High-score file
    #[arg(long, value_name = "FILE")]
    scores: Option<PathBuf>,

    /// Log file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// No terminal bell
    #[arg(long)]
    mute: bool,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Four-screen flow: no help screen, no name entry
    #[arg(long)]
    classic: bool,

    /// Keep high scores in memory only
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.scores {
            config.scores_path = path.clone();
        }
        if let Some(path) = &self.log {
            config.log_path = path.clone();
        }
        if self.mute {
            config.muted = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.classic {
            config.flow = Flow::Classic;
        }
    }
}

/// Log to a file; the terminal belongs to the game.  If the file can't be
/// opened the run goes unlogged.
fn init_logging(path: &Path) {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("space_potato: cannot open log {}: {e}", path.display());
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

// ── Event translation ─────────────────────────────────────────────────────────

fn key_of(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Turn one terminal event into core input events, updating the held-key map.
fn translate(event: Event, screen: &Screen, held: &mut HeldKeys, frame: u64) -> Vec<InputEvent> {
    match event {
        Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. })
            if modifiers.contains(KeyModifiers::CONTROL) =>
        {
            vec![InputEvent::Interrupt]
        }
        Event::Key(KeyEvent { code, kind, .. }) => {
            let Some(key) = key_of(code) else { return Vec::new() };
            let steering = direction_of(key).is_some();
            match kind {
                KeyEventKind::Press => {
                    if steering {
                        held.press(key, frame);
                    }
                    let mut events = vec![InputEvent::KeyDown(key)];
                    if let KeyCode::Char(c) = code {
                        events.push(InputEvent::Typed(c));
                    }
                    events
                }
                // Repeats keep steering alive and let Space auto-fire.
                KeyEventKind::Repeat if steering => {
                    held.press(key, frame);
                    vec![InputEvent::KeyDown(key)]
                }
                KeyEventKind::Repeat if key == Key::Space => vec![InputEvent::KeyDown(key)],
                KeyEventKind::Repeat => Vec::new(),
                KeyEventKind::Release => {
                    held.release(key);
                    vec![InputEvent::KeyUp(key)]
                }
            }
        }
        Event::Mouse(mouse) => {
            let at = screen.to_logical(mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => vec![InputEvent::PointerMove(at)],
                MouseEventKind::Down(MouseButton::Left) => {
                    vec![InputEvent::PointerMove(at), InputEvent::PointerPress(at)]
                }
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    screen: &mut Screen,
    config: &Config,
    audio: &mut Fallible,
    rng: &mut impl Rng,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;

    while !game.should_quit() {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            if let Event::Resize(cols, rows) = event {
                *screen = Screen::new(cols, rows, config.max_width, config.max_height);
                log::debug!("resized to {cols}x{rows} cells");
                game.handle(InputEvent::Resize(screen.viewport), rng);
                continue;
            }
            for input in translate(event, screen, &mut held, frame) {
                game.handle(input, rng);
            }
        }
        for key in held.expire(frame) {
            game.handle(InputEvent::KeyUp(key), rng);
        }

        game.update(rng);
        audio.play_all(game.drain_cues());
        display::render(out, screen, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env();
    args.apply(&mut config);
    init_logging(&config.log_path);
    log::info!("starting with {config:?}");

    let store: Box<dyn ScoreStore> = if args.no_save {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(&config.scores_path))
    };
    let sink: Box<dyn AudioSink> = if config.muted {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell::new(stdout()))
    };
    let mut audio = Fallible::new(sink);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key release events where the terminal supports them; elsewhere the
    // held-key window stands in.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = terminal::size().and_then(|(cols, rows)| {
        let mut screen = Screen::new(cols, rows, config.max_width, config.max_height);
        let mut game = Game::new(screen.viewport, config.flow, store, &mut rng);
        game_loop(&mut out, &mut game, &mut screen, &config, &mut audio, &mut rng, &rx)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match &result {
        Ok(()) => log::info!("clean exit"),
        Err(e) => log::warn!("terminal error: {e}"),
    }
    result
}
