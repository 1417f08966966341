//! Fire-and-forget signals the core raises for its collaborators: screen
//! shake for the renderer, sound cues for audio, and short on-screen texts.

/// Named sound trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    Explosion,
    Powerup,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Explosion => "explosion",
            Cue::Powerup => "powerup",
        }
    }
}

/// Transient shake request.  The newest request replaces the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: u32,
}

impl ScreenShake {
    pub fn apply(&mut self, intensity: f32, duration: u32) {
        self.intensity = intensity;
        self.duration = duration;
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Count down one frame.
    pub fn tick(&mut self) {
        self.duration = self.duration.saturating_sub(1);
    }

    /// Draw offset for `frame`, in logical pixels.  Deterministic so the
    /// renderer can sample it from an immutable snapshot.
    pub fn offset(&self, frame: u64) -> (f32, f32) {
        if !self.is_active() {
            return (0.0, 0.0);
        }
        let t = frame as f32;
        (
            (t * 12.9898).sin() * self.intensity,
            (t * 78.233).cos() * self.intensity,
        )
    }
}

/// A line of text shown for a limited number of frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub frames: u32,
}

pub const MESSAGE_FRAMES: u32 = 120;

/// Everything the core wants the outside world to notice this frame.
#[derive(Clone, Debug, Default)]
pub struct Feedback {
    pub shake: ScreenShake,
    cues: Vec<Cue>,
    /// Powerup pickup text.
    pub message: Option<Message>,
    /// "LEVEL n" banner.
    pub banner: Option<Message>,
}

impl Feedback {
    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Hand over all queued cues, oldest first.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message { text: text.into(), frames: MESSAGE_FRAMES });
    }

    pub fn show_banner(&mut self, text: impl Into<String>) {
        self.banner = Some(Message { text: text.into(), frames: MESSAGE_FRAMES });
    }

    /// Advance shake and text timers by one frame.
    pub fn tick(&mut self) {
        self.shake.tick();
        tick_message(&mut self.message);
        tick_message(&mut self.banner);
    }

    /// Forget everything except queued cues.
    pub fn reset(&mut self) {
        self.shake = ScreenShake::default();
        self.message = None;
        self.banner = None;
    }
}

fn tick_message(slot: &mut Option<Message>) {
    if let Some(msg) = slot {
        msg.frames = msg.frames.saturating_sub(1);
        if msg.frames == 0 {
            *slot = None;
        }
    }
}
