//! Audio cues and the mixer
//!
//! The game core never touches an audio runtime. It names the cue it wants
//! played and hands it to a [`Mixer`], which applies the mute gate and the
//! master volume before delegating to an injected [`AudioBackend`]. Any
//! backend failure (asset load or playback) is logged and swallowed: sound
//! is cosmetic and must never block a game state transition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::settings::Settings;

/// The audio cues the game can trigger
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum SoundCue {
    /// A settings control was clicked
    #[display("button-click")]
    ButtonClick,
    /// A participant was added to the roster
    #[display("player-added")]
    PlayerAdded,
    /// The game moved from the lobby to the active phase
    #[display("party-start")]
    StartParty,
    /// A new challenge was drawn
    #[display("new-challenge")]
    NewChallenge,
    /// The countdown timer started or is in its final seconds
    #[display("timer-tick")]
    TimerTick,
    /// The countdown timer reached zero
    #[display("timer-end")]
    TimerEnd,
}

impl SoundCue {
    /// The cue's base gain, scaled by the master volume at playback
    ///
    /// Loud one-off cues (party start, new challenge) sit high, repeated
    /// cues (timer ticks) sit low.
    pub fn base_gain(self) -> f32 {
        match self {
            Self::ButtonClick => 0.5,
            Self::PlayerAdded => 0.4,
            Self::StartParty => 0.8,
            Self::NewChallenge => 0.7,
            Self::TimerTick => 0.3,
            Self::TimerEnd => 0.6,
        }
    }
}

/// Errors an audio backend can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The audio asset for a cue could not be loaded
    #[error("audio asset failed to load: {0}")]
    Load(String),
    /// Playback of a loaded asset failed
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Capability for actually producing sound
///
/// Implemented by the embedding front-end (a web audio bridge in the
/// browser build). The core only ever calls it through a [`Mixer`], so
/// implementations may fail freely without affecting gameplay.
pub trait AudioBackend {
    /// Plays a cue at the given gain (0.0 to 1.0)
    ///
    /// # Errors
    ///
    /// Returns an [`AudioError`] if the asset cannot be loaded or played.
    fn play(&self, cue: SoundCue, gain: f32) -> Result<(), AudioError>;
}

/// A backend that produces no sound, for headless use
pub struct Silent;

impl AudioBackend for Silent {
    fn play(&self, _cue: SoundCue, _gain: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Applies mute and volume settings before handing cues to the backend
#[derive(Debug, Clone, Default)]
pub struct Mixer<B> {
    /// The injected audio capability
    backend: B,
}

impl<B: AudioBackend> Mixer<B> {
    /// Creates a mixer over the given backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Plays a cue unless muted, scaling its base gain by the master volume
    ///
    /// Backend failures are logged at warn level and dropped; this method
    /// never fails and never panics.
    pub fn play(&self, cue: SoundCue, settings: &Settings) {
        if settings.muted() {
            return;
        }
        let gain = cue.base_gain() * f32::from(settings.volume()) / 100.0;
        if let Err(error) = self.backend.play(cue, gain) {
            tracing::warn!(cue = %cue, error = %error, "dropping audio cue");
        }
    }
}
