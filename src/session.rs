//! Communication with the front-end
//!
//! This module defines the trait for tunneling messages from the game
//! engine to the rendering front-end. The tunnel abstraction keeps the
//! core headless: a browser build forwards messages over a JS bridge, a
//! test harness records them.

use super::{SyncMessage, UpdateMessage};

/// Trait for sending messages to the front-end
pub trait Tunnel {
    /// Sends an update message
    ///
    /// Update messages notify the front-end about individual changes that
    /// affect its current view.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a state synchronization message
    ///
    /// Sync messages carry the full current view, typically requested when
    /// the front-end (re)mounts.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);
}
