use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sounds {
    PortalFire,
    Switch,
    Checkpoint,
    ExitReached,
}

impl Sounds {
    pub fn name(&self) -> &'static str {
        use Sounds::*;
        match self {
            PortalFire => "portal_fire",
            Switch => "switch",
            Checkpoint => "checkpoint",
            ExitReached => "exit_reached",
        }
    }

    /// ExitReached replaces the current music track; all else can play simultaneously.
    pub fn should_pause_current_track(&self) -> bool {
        matches!(self, Sounds::ExitReached)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// The narrow hook through which the simulation requests sound playback. Playback itself
/// lives outside the simulation; a Level owns one of these and forwards every PlaySound event to it.
pub trait SoundPlayer {
    fn play_sound(&mut self, sound: Sounds);
}

/// SoundPlayer for headless runs, which writes each request to the log.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    pub sounds_played: usize,
}

impl SoundPlayer for LoggingAudio {
    fn play_sound(&mut self, sound: Sounds) {
        self.sounds_played += 1;
        info!(
            "LoggingAudio::play_sound {} (interrupts track: {})",
            sound.name(),
            sound.should_pause_current_track()
        );
    }
}

/// Discards every request.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl SoundPlayer for SilentAudio {
    fn play_sound(&mut self, _sound: Sounds) {}
}
