//! Challenge template texts and their placeholder markers
//!
//! A template is an immutable string containing zero or more typed
//! placeholder markers: `{}` for any participant, `{boy}` for a male
//! participant, `{girl}` for a female participant. Templates are scanned
//! once on construction into a sequence of literal and marker segments, so
//! substitution is purely positional: the first drawn name fills the first
//! marker occurrence, left to right.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a placeholder marker within a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Filled by any participant
    Any,
    /// Filled by a male participant
    Male,
    /// Filled by a female participant
    Female,
}

impl Marker {
    /// The textual token this marker is written as in template text
    pub fn token(self) -> &'static str {
        match self {
            Self::Any => "{}",
            Self::Male => "{boy}",
            Self::Female => "{girl}",
        }
    }
}

/// One scanned piece of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Literal text copied into the output verbatim
    Literal(String),
    /// A placeholder consumed by substitution
    Marker(Marker),
}

/// Errors that can occur when parsing a template
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The template text is empty or contains only whitespace
    #[error("challenge text cannot be empty")]
    Empty,
    /// The template text exceeds the maximum allowed length
    #[error("challenge text is too long")]
    TooLong,
}

/// A validated, pre-scanned challenge template
///
/// Serializes as its raw text and re-scans on deserialization, so the wire
/// form is just a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChallengeTemplate {
    /// The raw template text
    text: String,
    /// The scanned literal/marker sequence
    segments: Vec<Segment>,
}

impl ChallengeTemplate {
    /// Parses a template text, scanning its markers
    ///
    /// Brace sequences that are not one of the three marker tokens stay
    /// literal text, so `{sigh}` survives substitution untouched.
    ///
    /// # Errors
    ///
    /// * `Error::Empty` - Text is empty or whitespace-only
    /// * `Error::TooLong` - Text exceeds the maximum length
    pub fn parse(text: &str) -> Result<Self, Error> {
        if text.trim().is_empty() {
            return Err(Error::Empty);
        }
        if text.len() > crate::constants::template::MAX_TEXT_LENGTH {
            return Err(Error::TooLong);
        }
        Ok(Self {
            text: text.to_owned(),
            segments: scan(text),
        })
    }

    /// The raw template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The scanned literal/marker sequence, in template order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterates over the markers of the template, left to right
    pub fn markers(&self) -> impl Iterator<Item = Marker> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Marker(marker) => Some(*marker),
            Segment::Literal(_) => None,
        })
    }

    /// The number of slots reserved for the given marker kind
    pub fn required(&self, marker: Marker) -> usize {
        self.markers().filter(|m| *m == marker).count()
    }
}

impl TryFrom<String> for ChallengeTemplate {
    type Error = Error;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<ChallengeTemplate> for String {
    fn from(template: ChallengeTemplate) -> Self {
        template.text
    }
}

/// Scans template text into literal and marker segments
fn scan(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let (before, tail) = rest.split_at(open);
        literal.push_str(before);
        if let Some(marker) = [Marker::Male, Marker::Female, Marker::Any]
            .into_iter()
            .find(|marker| tail.starts_with(marker.token()))
        {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Marker(marker));
            rest = &tail[marker.token().len()..];
        } else {
            // a lone brace or an unknown {...} sequence stays literal
            literal.push('{');
            rest = &tail[1..];
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
