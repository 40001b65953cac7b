use crate::audio::Sounds;

/// An Event payload for Message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Asks the recipient obstacle to look up a reaction rule keyed by the sender's id.
    /// Sent with no recipient it reaches every obstacle in the level except the sender.
    Signal,

    /// Request to play a sound effect through the level's sound hook
    PlaySound(Sounds),

    /// Sent by the character when it touched a Death surface or was crushed.
    /// The level responds by counting the death and respawning at the last checkpoint.
    PlayerDied,
}
