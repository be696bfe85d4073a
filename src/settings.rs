//! Session settings and their reducer
//!
//! Settings are a plain immutable value rewritten through
//! [`Settings::apply`] rather than mutated in place or held in ambient
//! global state. Every update clamps and quantizes its input, so a
//! `Settings` value is valid by construction; [`garde`] validation is
//! additionally available for values arriving from outside the typed API.

use enum_map::Enum;
use garde::Validate;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// The color theme of the front-end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light backgrounds, dark text
    Light,
    /// Dark backgrounds, light text
    #[default]
    Dark,
}

/// The display language, which also selects the challenge catalog
///
/// This is a closed set: adding a language means shipping a challenge
/// catalog for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Language {
    /// English
    #[default]
    #[serde(rename = "en")]
    English,
    /// Brazilian Portuguese
    #[serde(rename = "pt")]
    Portuguese,
}

/// Validation result type for custom validators
type ValidationResult = garde::Result;

/// Validates that the challenge timer duration is within its bounds
fn validate_timer_interval(val: &Duration) -> ValidationResult {
    let bounds = crate::constants::settings::MIN_TIMER_SECONDS
        ..=crate::constants::settings::MAX_TIMER_SECONDS;
    if bounds.contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "timer_interval is outside of the bounds [{},{}]",
            bounds.start(),
            bounds.end(),
        )))
    }
}

/// Cosmetic configuration for the session
///
/// All fields are pure configuration values; none affect the rules of the
/// game beyond which challenge catalog is drawn from and how long the
/// countdown timer runs.
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Whether all audio cues are suppressed
    #[garde(skip)]
    muted: bool,
    /// Master volume in percent (0-100)
    #[garde(range(max = crate::constants::settings::MAX_VOLUME))]
    volume: u8,
    /// Front-end color theme
    #[garde(skip)]
    theme: Theme,
    /// Display language and challenge catalog selection
    #[garde(skip)]
    language: Language,
    /// Countdown duration for the challenge timer
    #[garde(custom(|v, _| validate_timer_interval(v)))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    timer_interval: Duration,
}

impl Default for Settings {
    /// Default settings: sound on at 70%, dark theme, English, 30 s timer
    fn default() -> Self {
        Self {
            muted: false,
            volume: crate::constants::settings::DEFAULT_VOLUME,
            theme: Theme::Dark,
            language: Language::English,
            timer_interval: Duration::from_secs(
                crate::constants::settings::DEFAULT_TIMER_SECONDS,
            ),
        }
    }
}

/// A single settings update
///
/// Actions map one-to-one onto the controls of the settings dialog.
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsAction {
    /// Toggles audio suppression
    ToggleMute,
    /// Sets the master volume (clamped to 0-100)
    SetVolume(u8),
    /// Switches between the light and dark theme
    ToggleTheme,
    /// Selects the display language
    SetLanguage(Language),
    /// Sets the challenge timer duration (clamped and step-quantized)
    SetTimerInterval(#[serde_as(as = "serde_with::DurationSeconds<u64>")] Duration),
}

impl Settings {
    /// Produces the settings resulting from applying one action
    ///
    /// This is a pure reducer: the receiver is consumed by value and the
    /// returned settings are always valid, with out-of-range inputs clamped
    /// and the timer duration snapped to its step.
    #[must_use]
    pub fn apply(self, action: SettingsAction) -> Self {
        match action {
            SettingsAction::ToggleMute => Self {
                muted: !self.muted,
                ..self
            },
            SettingsAction::SetVolume(volume) => Self {
                volume: volume.min(crate::constants::settings::MAX_VOLUME),
                ..self
            },
            SettingsAction::ToggleTheme => Self {
                theme: match self.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                },
                ..self
            },
            SettingsAction::SetLanguage(language) => Self { language, ..self },
            SettingsAction::SetTimerInterval(interval) => Self {
                timer_interval: Self::quantize_interval(interval),
                ..self
            },
        }
    }

    /// Clamps a timer duration to its bounds and snaps it to the step
    fn quantize_interval(interval: Duration) -> Duration {
        let min = crate::constants::settings::MIN_TIMER_SECONDS;
        let max = crate::constants::settings::MAX_TIMER_SECONDS;
        let step = crate::constants::settings::TIMER_STEP_SECONDS;
        let secs = interval.as_secs().clamp(min, max);
        let snapped = ((secs + step / 2) / step) * step;
        Duration::from_secs(snapped.clamp(min, max))
    }

    /// Whether audio cues are suppressed
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Master volume in percent (0-100)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// The front-end color theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The display language
    pub fn language(&self) -> Language {
        self.language
    }

    /// The countdown duration for the challenge timer
    pub fn timer_interval(&self) -> Duration {
        self.timer_interval
    }
}
