//! Sound output.  The core only names cues; a sink decides what they sound
//! like.  Sound is best-effort: a sink that fails once goes quiet for the
//! rest of the run.

use std::io::Write;

use crate::error::{GameError, Result};
use crate::feedback::Cue;

pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> Result<()>;
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell for explosions and pickups.  Shots are too
/// frequent to be worth a bell each.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<()> {
        if cue == Cue::Shoot {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| GameError::Audio(format!("bell for {}: {e}", cue.name())))
    }
}

/// Wraps a sink and switches it off after its first error.
pub struct Fallible {
    inner: Box<dyn AudioSink>,
    enabled: bool,
    played: u64,
}

impl Fallible {
    pub fn new(inner: Box<dyn AudioSink>) -> Self {
        Self { inner, enabled: true, played: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cues actually handed to the inner sink.
    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn play_all(&mut self, cues: impl IntoIterator<Item = Cue>) {
        for cue in cues {
            self.play_quietly(cue);
        }
    }

    fn play_quietly(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        match self.inner.play(cue) {
            Ok(()) => self.played += 1,
            Err(e) => {
                log::warn!("{e}; sound disabled");
                self.enabled = false;
            }
        }
    }
}
