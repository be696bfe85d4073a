//! Participant registration and roster management
//!
//! This module tracks the participants of a game session: their identity,
//! display name, and gender attribute used to gate gendered challenge
//! templates. It validates names on registration, keeps a gender index for
//! efficient lookups, and decides whether a game is allowed to start.

use std::{collections::HashSet, fmt::Display, str::FromStr};

use enum_map::{Enum, EnumMap};
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;

/// A unique identifier for a registered participant
///
/// Each participant gets a unique ID on registration that persists until
/// they are removed from the roster. Penalty tallies are keyed by this ID
/// and outlive roster membership.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random participant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    /// Creates a new random participant ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Id {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    /// Parses an ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The gender attribute of a participant
///
/// Challenge templates may reserve slots for a specific gender; the roster
/// keeps a per-gender index so the selector can check template eligibility
/// without scanning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Enum,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// A male participant, eligible for male-marker slots
    #[display("male")]
    Male,
    /// A female participant, eligible for female-marker slots
    #[display("female")]
    Female,
}

/// A registered player
///
/// Created on roster add and never mutated afterwards; identity is the
/// [`Id`], removal happens only through an explicit roster remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identity of the participant
    pub id: Id,
    /// Display name, trimmed and validated on registration
    pub name: String,
    /// Gender attribute used to gate gendered template slots
    pub gender: Gender,
}

/// Errors that can occur when registering a participant
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Inappropriate,
    /// The roster has reached the maximum number of participants
    #[error("maximum number of participants reached")]
    Full,
}

/// Errors describing why a game cannot start yet
///
/// These are surfaced to the user verbatim, so each variant names the
/// specific unmet constraint.
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// Fewer participants are registered than a game requires
    #[error("at least 2 participants are required, only {current} registered")]
    NotEnoughParticipants {
        /// Number of participants currently registered
        current: usize,
    },
    /// No participant of the named gender is registered
    #[error("at least one {0} participant is required")]
    MissingGender(Gender),
}

/// Serialization helper for the Roster struct
#[derive(Deserialize)]
struct RosterSerde {
    participants: Vec<Participant>,
}

/// The set of registered participants for one session
///
/// Participants are kept in registration order (the order the UI displays
/// them in) with a gender index maintained alongside for constant-time
/// per-gender counts.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "RosterSerde")]
pub struct Roster {
    /// Participants in registration order
    participants: Vec<Participant>,

    /// Per-gender index for efficient counting and filtering
    #[serde(skip_serializing)]
    by_gender: EnumMap<Gender, HashSet<Id>>,
}

impl From<RosterSerde> for Roster {
    /// Reconstructs the Roster from serialized data
    ///
    /// This rebuilds the gender index from the participant list, which is
    /// necessary since the index is not serialized.
    fn from(serde: RosterSerde) -> Self {
        let RosterSerde { participants } = serde;
        let mut by_gender: EnumMap<Gender, HashSet<Id>> = EnumMap::default();
        for participant in &participants {
            by_gender[participant.gender].insert(participant.id);
        }
        Self {
            participants,
            by_gender,
        }
    }
}

impl Roster {
    /// Registers a new participant after validating their name
    ///
    /// The name is trimmed of surrounding whitespace and checked for length,
    /// emptiness, and inappropriate content. Names are not required to be
    /// unique: two participants may share a display name, and all selection
    /// guarantees are per participant rather than per name.
    ///
    /// # Arguments
    ///
    /// * `name` - The requested display name (will be trimmed)
    /// * `gender` - The participant's gender attribute
    ///
    /// # Returns
    ///
    /// The newly created participant on success.
    ///
    /// # Errors
    ///
    /// * `Error::TooLong` - Name exceeds 30 bytes
    /// * `Error::Empty` - Name is empty after trimming whitespace
    /// * `Error::Inappropriate` - Name contains inappropriate content
    /// * `Error::Full` - The roster is at capacity
    pub fn add(&mut self, name: &str, gender: Gender) -> Result<Participant, Error> {
        if self.participants.len() >= crate::constants::roster::MAX_PARTICIPANTS {
            return Err(Error::Full);
        }
        if name.len() > crate::constants::roster::MAX_NAME_LENGTH {
            return Err(Error::TooLong);
        }
        let name = rustrict::trim_whitespace(name);
        if name.is_empty() {
            return Err(Error::Empty);
        }
        if name.is_inappropriate() {
            return Err(Error::Inappropriate);
        }
        let participant = Participant {
            id: Id::new(),
            name: name.to_owned(),
            gender,
        };
        self.by_gender[gender].insert(participant.id);
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Removes a participant by ID
    ///
    /// Removing an absent ID is a no-op, making this safe to call from
    /// repeated UI events.
    ///
    /// # Returns
    ///
    /// The removed participant, or `None` if the ID was not registered.
    pub fn remove(&mut self, id: Id) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        let participant = self.participants.remove(index);
        self.by_gender[participant.gender].remove(&id);
        Some(participant)
    }

    /// Looks up a participant by ID
    pub fn get(&self, id: Id) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Checks whether a participant is registered
    pub fn contains(&self, id: Id) -> bool {
        self.by_gender.values().any(|ids| ids.contains(&id))
    }

    /// Iterates over all participants in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Iterates over participants of one gender in registration order
    pub fn gendered(&self, gender: Gender) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.gender == gender)
    }

    /// Returns the number of registered participants
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Checks if the roster has no participants
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Returns the number of participants of one gender
    pub fn count(&self, gender: Gender) -> usize {
        self.by_gender[gender].len()
    }

    /// Checks whether a game may start with the current roster
    ///
    /// A game requires at least two participants and at least one
    /// participant of each gender.
    pub fn can_start(&self) -> bool {
        self.ensure_can_start().is_ok()
    }

    /// Checks the start requirements, naming the first unmet one
    ///
    /// # Errors
    ///
    /// * `StartError::NotEnoughParticipants` - Fewer than two registered
    /// * `StartError::MissingGender` - One gender has no participants
    pub fn ensure_can_start(&self) -> Result<(), StartError> {
        if self.participants.len() < crate::constants::roster::MIN_START_PARTICIPANTS {
            return Err(StartError::NotEnoughParticipants {
                current: self.participants.len(),
            });
        }
        for gender in [Gender::Male, Gender::Female] {
            if self.count(gender) == 0 {
                return Err(StartError::MissingGender(gender));
            }
        }
        Ok(())
    }
}
