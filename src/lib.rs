//! # Festa Game Library
//!
//! This library provides the core game logic for the Festa party game.
//! It handles the participant roster, randomized challenge selection with
//! name substitution, penalty tallying, session settings, and the
//! challenge countdown timer. The core is headless: it emits serializable
//! messages to a rendering front-end through an injected tunnel and plays
//! audio cues through an injected backend, so the whole crate runs
//! unchanged in the browser (WASM) and in native tests.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::doc_markdown)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod challenge;
pub mod game;
pub mod ledger;
pub mod roster;
pub mod session;
pub mod settings;
pub mod sound;
pub mod timer;

/// Messages sent to update the front-end view
///
/// This enum aggregates all update messages the core can emit, so a
/// single tunnel carries session changes and timer changes alike.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum UpdateMessage {
    /// General session updates
    Game(game::UpdateMessage),
    /// Countdown timer updates
    Timer(timer::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages carrying the full current view
///
/// Sent to synchronize a front-end that (re)mounts with the current
/// session state.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// Session-level view synchronization
    Game(game::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// Alarms are handed to the embedding's scheduler and delivered back to
/// [`game::Game::receive_alarm`] after their delay.
#[derive(Debug, Clone, Copy, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Countdown timer ticks
    Timer(timer::AlarmMessage),
}
