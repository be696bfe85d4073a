//! Session control and game flow
//!
//! This module contains the main game struct and logic for one party-game
//! session: the lobby/active state machine, challenge draws, penalty
//! bookkeeping, countdown orchestration, settings updates, and the
//! messages that keep the front-end in sync. The game owns all state and
//! only talks to the outside world through the injected [`Tunnel`] and
//! [`Mixer`] collaborators, so it runs headless in tests.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Duration;

use crate::{
    AlarmMessage,
    challenge::{
        catalog,
        selector::{self, ResolvedChallenge},
        template::ChallengeTemplate,
    },
    ledger::PenaltyLedger,
    roster::{self, Gender, Id, Participant, Roster, StartError},
    session::Tunnel,
    settings::{Settings, SettingsAction},
    sound::{AudioBackend, Mixer, SoundCue},
    timer::{self, Countdown, Tick},
};

/// Represents the current phase of the session
///
/// A session is either in the lobby, registering participants, or in an
/// active game drawing challenges. There are no other phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum State {
    /// Registering participants before the game starts
    Lobby,
    /// An active game drawing challenges
    Active(Box<Round>),
}

/// Mutable state of an active game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Round {
    /// The challenge currently on display, if a draw has succeeded
    challenge: Option<ResolvedChallenge>,
    /// The running countdown, if the timer was started
    countdown: Option<Countdown>,
}

/// Configuration options for the game session
#[derive(Debug, Clone, Default, Serialize, Deserialize, garde::Validate)]
pub struct Options {
    /// Tuning options passed through to the challenge selector
    #[garde(dive)]
    pub selector: selector::Options,
    /// Challenge set override (None plays the built-in catalog of the
    /// currently selected language)
    #[garde(skip)]
    pub templates: Option<Vec<ChallengeTemplate>>,
}

/// The main game session struct
///
/// Holds the roster, the penalty ledger, the settings, and the current
/// phase. Collaborators (the front-end tunnel, the audio mixer, the alarm
/// scheduler) are passed into each operation rather than owned, mirroring
/// the event-driven embedding: every mutation happens in response to a
/// discrete user action or a scheduled alarm.
#[derive(Debug, Serialize, Deserialize)]
pub struct Game {
    /// Registered participants
    roster: Roster,
    /// Accumulated penalties, kept across games within the session
    ledger: PenaltyLedger,
    /// Cosmetic configuration
    settings: Settings,
    /// Current phase of the session
    pub state: State,
    /// Session configuration options
    options: Options,
    /// Bumped whenever the countdown starts or tears down; alarms carrying
    /// an older epoch are stale and get dropped
    timer_epoch: u64,
}

/// Update messages sent to the front-end about session changes
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// A participant joined the roster
    ParticipantAdded(Participant),
    /// A participant left the roster
    ParticipantRemoved(Id),
    /// The game moved from the lobby to the active phase
    GameStarted,
    /// The game returned to the lobby
    GameEnded,
    /// A freshly drawn challenge to display
    Challenge {
        /// The fully substituted challenge text
        text: String,
    },
    /// Report that no challenge could be drawn
    ChallengeError(selector::Error),
    /// A penalty was tallied
    PenaltyAdded {
        /// The participant the penalty was given to
        participant: Id,
        /// Their new total
        total: u64,
    },
    /// The settings changed
    SettingsChanged(Settings),
}

/// One row of the penalty tracker
#[derive(Debug, Serialize, Clone)]
pub struct PenaltyRow {
    /// The participant's ID
    pub participant: Id,
    /// The participant's display name
    pub name: String,
    /// Their accumulated penalty count
    pub count: u64,
}

/// Sync messages carrying the full current view
///
/// Sent when the front-end (re)mounts so it can render the phase from
/// scratch. Penalty rows cover current roster members only; stale ledger
/// entries for removed participants are filtered here and nowhere else.
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The lobby view
    Lobby {
        /// Participants in registration order
        participants: Vec<Participant>,
        /// Whether the start requirements are currently met
        can_start: bool,
    },
    /// The active-game view
    Active {
        /// The challenge currently on display
        challenge: Option<String>,
        /// Whole seconds left on the countdown, if it is running
        timer_remaining: Option<u64>,
        /// Penalty tallies for the current roster
        penalties: Vec<PenaltyRow>,
    },
}

impl Default for Game {
    /// Creates a session with default options
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Game {
    /// Creates a new session in the lobby phase
    pub fn new(options: Options) -> Self {
        Self {
            roster: Roster::default(),
            ledger: PenaltyLedger::default(),
            settings: Settings::default(),
            state: State::Lobby,
            options,
            timer_epoch: 0,
        }
    }

    /// The registered participants
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The accumulated penalty tallies
    pub fn ledger(&self) -> &PenaltyLedger {
        &self.ledger
    }

    /// The current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sets the current session state
    fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// The challenge set draws come from
    fn templates(&self) -> &[ChallengeTemplate] {
        match &self.options.templates {
            Some(custom) => custom,
            None => catalog::builtin(self.settings.language()),
        }
    }

    /// Registers a participant
    ///
    /// On success the front-end is notified and the player-added cue
    /// plays. On failure nothing is announced; the caller surfaces the
    /// validation error as a transient notification.
    ///
    /// # Errors
    ///
    /// Returns a [`roster::Error`] when the name fails validation or the
    /// roster is full.
    pub fn add_participant<T: Tunnel, B: AudioBackend>(
        &mut self,
        name: &str,
        gender: Gender,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) -> Result<Participant, roster::Error> {
        let participant = self.roster.add(name, gender)?;
        mixer.play(SoundCue::PlayerAdded, &self.settings);
        tunnel.send_message(&UpdateMessage::ParticipantAdded(participant.clone()).into());
        Ok(participant)
    }

    /// Removes a participant from the roster
    ///
    /// Idempotent: removing an absent ID announces nothing. The
    /// participant's penalty tally is retained.
    pub fn remove_participant<T: Tunnel>(&mut self, id: Id, tunnel: &T) {
        if self.roster.remove(id).is_some() {
            tunnel.send_message(&UpdateMessage::ParticipantRemoved(id).into());
        }
    }

    /// Starts the game, moving from the lobby to the active phase
    ///
    /// Requires the start conditions to be met; on success plays the
    /// party-start cue and immediately draws the first challenge. A failed
    /// first draw does not abort the transition; it is announced as a
    /// [`UpdateMessage::ChallengeError`] instead. Starting an already
    /// active game is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StartError`] naming the unmet start requirement.
    pub fn start<T: Tunnel, B: AudioBackend>(
        &mut self,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) -> Result<(), StartError> {
        if let State::Active(_) = self.state {
            return Ok(());
        }
        self.roster.ensure_can_start()?;

        tracing::debug!(participants = self.roster.len(), "starting game");
        self.set_state(State::Active(Box::default()));
        mixer.play(SoundCue::StartParty, &self.settings);
        tunnel.send_message(&UpdateMessage::GameStarted.into());

        let _ = self.draw_challenge(tunnel, mixer);
        Ok(())
    }

    /// Ends the game, returning to the lobby
    ///
    /// Always permitted. Preserves the roster, the ledger, and the
    /// settings; discards the round, invalidating any scheduled countdown
    /// tick so a stale callback cannot fire against a torn-down view.
    pub fn end<T: Tunnel>(&mut self, tunnel: &T) {
        if let State::Active(_) = self.state {
            tracing::debug!("ending game");
            self.timer_epoch += 1;
            self.set_state(State::Lobby);
            tunnel.send_message(&UpdateMessage::GameEnded.into());
        }
    }

    /// Draws the next challenge
    ///
    /// Only has an effect in the active phase. On success the new text is
    /// announced and the new-challenge cue plays; on failure the error is
    /// announced and the previous challenge stays on display.
    ///
    /// # Errors
    ///
    /// Returns [`selector::Error::InsufficientParticipants`] when no
    /// template in the set is playable with the current roster.
    pub fn next_challenge<T: Tunnel, B: AudioBackend>(
        &mut self,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) -> Result<(), selector::Error> {
        match self.state {
            State::Active(_) => self.draw_challenge(tunnel, mixer),
            State::Lobby => Ok(()),
        }
    }

    /// Runs the selector and announces the outcome
    fn draw_challenge<T: Tunnel, B: AudioBackend>(
        &mut self,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) -> Result<(), selector::Error> {
        match selector::select(&self.roster, self.templates(), self.options.selector) {
            Ok(challenge) => {
                tunnel.send_message(
                    &UpdateMessage::Challenge {
                        text: challenge.text().to_owned(),
                    }
                    .into(),
                );
                mixer.play(SoundCue::NewChallenge, &self.settings);
                if let State::Active(round) = &mut self.state {
                    round.challenge = Some(challenge);
                }
                Ok(())
            }
            Err(error) => {
                tunnel.send_message(&UpdateMessage::ChallengeError(error).into());
                Err(error)
            }
        }
    }

    /// Tallies one penalty for a participant
    ///
    /// Penalties are independent of the phase and of roster membership;
    /// the tally of a removed participant keeps growing if the UI still
    /// offers the action.
    ///
    /// # Returns
    ///
    /// The participant's new total.
    pub fn add_penalty<T: Tunnel>(&mut self, id: Id, tunnel: &T) -> u64 {
        let total = self.ledger.increment(id);
        tunnel.send_message(
            &UpdateMessage::PenaltyAdded {
                participant: id,
                total,
            }
            .into(),
        );
        total
    }

    /// Starts the countdown timer
    ///
    /// Only has an effect in the active phase, and is a no-op while a
    /// countdown is already running. Announces the start, plays one tick
    /// cue, and schedules the first tick alarm one second out.
    ///
    /// # Arguments
    ///
    /// * `schedule_alarm` - Function to schedule delayed alarm messages
    /// * `tunnel` - The front-end message channel
    /// * `mixer` - The audio mixer
    pub fn start_timer<T: Tunnel, B: AudioBackend, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        mut schedule_alarm: S,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) {
        let State::Active(round) = &mut self.state else {
            return;
        };
        if round.countdown.is_some() {
            return;
        }

        let duration = self.settings.timer_interval();
        round.countdown = Some(Countdown::new(duration));
        self.timer_epoch += 1;

        mixer.play(SoundCue::TimerTick, &self.settings);
        tunnel.send_message(&timer::UpdateMessage::Started { duration }.into());
        schedule_alarm(
            timer::AlarmMessage::Tick {
                epoch: self.timer_epoch,
            }
            .into(),
            Duration::from_secs(1),
        );
    }

    /// Handles a scheduled alarm
    ///
    /// Alarms from an earlier timer epoch are stale (the countdown they
    /// belonged to was torn down by [`Game::end`] or by completing) and
    /// are dropped without any observable effect. A live tick advances the
    /// countdown, announces the remaining time, plays the warning cue in
    /// the final seconds, and either reschedules itself or finishes the
    /// countdown with the end cue.
    pub fn receive_alarm<T: Tunnel, B: AudioBackend, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        mut schedule_alarm: S,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) {
        match message {
            AlarmMessage::Timer(timer::AlarmMessage::Tick { epoch }) => {
                if epoch != self.timer_epoch {
                    return;
                }
                let State::Active(round) = &mut self.state else {
                    return;
                };
                let Some(countdown) = &mut round.countdown else {
                    return;
                };

                match countdown.tick() {
                    Tick::Running(remaining) => {
                        tunnel.send_message(&timer::UpdateMessage::Tick { remaining }.into());
                        schedule_alarm(
                            timer::AlarmMessage::Tick { epoch }.into(),
                            Duration::from_secs(1),
                        );
                    }
                    Tick::Warning(remaining) => {
                        tunnel.send_message(&timer::UpdateMessage::Tick { remaining }.into());
                        mixer.play(SoundCue::TimerTick, &self.settings);
                        schedule_alarm(
                            timer::AlarmMessage::Tick { epoch }.into(),
                            Duration::from_secs(1),
                        );
                    }
                    Tick::Finished => {
                        round.countdown = None;
                        self.timer_epoch += 1;
                        tunnel.send_message(&timer::UpdateMessage::Ended.into());
                        mixer.play(SoundCue::TimerEnd, &self.settings);
                    }
                }
            }
        }
    }

    /// Applies one settings action through the pure reducer
    ///
    /// Plays the button-click cue under the settings in effect before the
    /// change, so unmuting clicks silently and muting clicks audibly, then
    /// announces the new settings.
    pub fn apply_settings<T: Tunnel, B: AudioBackend>(
        &mut self,
        action: SettingsAction,
        tunnel: &T,
        mixer: &Mixer<B>,
    ) {
        mixer.play(SoundCue::ButtonClick, &self.settings);
        self.settings = self.settings.apply(action);
        tunnel.send_message(&UpdateMessage::SettingsChanged(self.settings).into());
    }

    /// Returns the message necessary to render the current phase
    pub fn state_message(&self) -> crate::SyncMessage {
        match &self.state {
            State::Lobby => SyncMessage::Lobby {
                participants: self.roster.iter().cloned().collect_vec(),
                can_start: self.roster.can_start(),
            }
            .into(),
            State::Active(round) => SyncMessage::Active {
                challenge: round.challenge.as_ref().map(|c| c.text().to_owned()),
                timer_remaining: round.countdown.as_ref().map(Countdown::remaining),
                penalties: self
                    .roster
                    .iter()
                    .map(|participant| PenaltyRow {
                        participant: participant.id,
                        name: participant.name.clone(),
                        count: self.ledger.count(participant.id),
                    })
                    .collect_vec(),
            }
            .into(),
        }
    }

    /// Sends the full current view through the tunnel
    pub fn sync<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message());
    }
}
