//! Challenge selection and name substitution
//!
//! The selector draws one template uniformly from the subset the current
//! roster can satisfy and substitutes participant names into its markers.
//! Within one resolved challenge no two male slots share a participant and
//! no two female slots share a participant; the "any" slots draw from a
//! separate pool sampled without replacement from the whole roster, so the
//! classes are independent and a participant may appear once per class.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::template::{ChallengeTemplate, Marker, Segment};
use crate::roster::{Gender, Participant, Roster};

/// Tuning options for challenge selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, garde::Validate)]
pub struct Options {
    /// Cap on how many participants the "any" pool is drawn from
    ///
    /// `None` draws from the whole roster. With a cap set, templates with
    /// more "any" markers than the cap leave the surplus markers as
    /// literal tokens in the output.
    #[garde(range(min = 1))]
    pub any_pool_limit: Option<usize>,
}

/// Failures of challenge selection
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No template in the set can be satisfied by the current roster
    #[error("no challenge is playable with the current participants")]
    InsufficientParticipants,
}

/// A fully substituted challenge, produced transiently per draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChallenge {
    /// The challenge text with markers replaced by participant names
    text: String,
    /// Number of "any" markers left unresolved because the pool ran dry
    unresolved: usize,
}

impl ResolvedChallenge {
    /// The challenge text with markers replaced by participant names
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of "any" markers left as literal tokens in the text
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }
}

/// Draws one challenge from the template set
///
/// A template is eligible iff the roster has at least as many males as the
/// template's male markers and likewise for females; "any" markers never
/// affect eligibility. Sampling uniformly among eligible templates has the
/// same distribution as resampling on rejection, without the unbounded
/// retry loop.
///
/// # Errors
///
/// Returns [`Error::InsufficientParticipants`] when no template is
/// eligible, including for an empty template set.
pub fn select(
    roster: &Roster,
    templates: &[ChallengeTemplate],
    options: Options,
) -> Result<ResolvedChallenge, Error> {
    let eligible = templates
        .iter()
        .filter(|template| is_eligible(template, roster))
        .collect_vec();
    if eligible.is_empty() {
        return Err(Error::InsufficientParticipants);
    }
    let template = eligible[fastrand::usize(0..eligible.len())];
    Ok(resolve(template, roster, options))
}

/// Checks whether the roster can fill a template's gendered slots
fn is_eligible(template: &ChallengeTemplate, roster: &Roster) -> bool {
    roster.count(Gender::Male) >= template.required(Marker::Male)
        && roster.count(Gender::Female) >= template.required(Marker::Female)
}

/// Samples up to `amount` participants without replacement
fn draw<'a>(
    pool: impl Iterator<Item = &'a Participant>,
    amount: usize,
) -> std::vec::IntoIter<&'a Participant> {
    let mut candidates = pool.collect_vec();
    fastrand::shuffle(&mut candidates);
    candidates.truncate(amount);
    candidates.into_iter()
}

/// Substitutes participant names into an eligible template
fn resolve(template: &ChallengeTemplate, roster: &Roster, options: Options) -> ResolvedChallenge {
    let mut males = draw(
        roster.gendered(Gender::Male),
        template.required(Marker::Male),
    );
    let mut females = draw(
        roster.gendered(Gender::Female),
        template.required(Marker::Female),
    );
    let any_pool_size = options.any_pool_limit.unwrap_or(roster.len());
    let mut any_pool = draw(roster.iter(), any_pool_size);

    let mut text = String::new();
    let mut unresolved = 0;
    for segment in template.segments() {
        match segment {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Marker(marker) => {
                // the gendered iterators are sized by eligibility and never
                // run dry; only the any pool can
                let participant = match marker {
                    Marker::Male => males.next(),
                    Marker::Female => females.next(),
                    Marker::Any => any_pool.next(),
                };
                match participant {
                    Some(participant) => text.push_str(&participant.name),
                    None => {
                        unresolved += 1;
                        text.push_str(marker.token());
                    }
                }
            }
        }
    }
    ResolvedChallenge { text, unresolved }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::roster::Gender;

    fn roster_of(entries: &[(&str, Gender)]) -> Roster {
        let mut roster = Roster::default();
        for (name, gender) in entries {
            roster.add(name, *gender).unwrap();
        }
        roster
    }

    fn templates_of(texts: &[&str]) -> Vec<ChallengeTemplate> {
        texts
            .iter()
            .map(|text| ChallengeTemplate::parse(text).unwrap())
            .collect()
    }

    #[test]
    fn test_markerless_template_resolves_verbatim() {
        let roster = roster_of(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let templates = templates_of(&["Everyone swaps seats."]);

        for seed in 0..20 {
            fastrand::seed(seed);
            let resolved = select(&roster, &templates, Options::default()).unwrap();
            assert_eq!(resolved.text(), "Everyone swaps seats.");
            assert_eq!(resolved.unresolved(), 0);
        }
    }

    #[test]
    fn test_male_slots_get_distinct_males() {
        let roster = roster_of(&[
            ("Alice", Gender::Female),
            ("Bob", Gender::Male),
            ("Carl", Gender::Male),
        ]);
        let templates = templates_of(&["{boy} vs {boy}!"]);

        for seed in 0..20 {
            fastrand::seed(seed);
            let resolved = select(&roster, &templates, Options::default()).unwrap();
            assert!(
                resolved.text() == "Bob vs Carl!" || resolved.text() == "Carl vs Bob!",
                "unexpected resolution: {}",
                resolved.text()
            );
        }
    }

    #[test]
    fn test_all_female_roster_reports_insufficient_participants() {
        let roster = roster_of(&[("Alice", Gender::Female), ("Beth", Gender::Female)]);
        let templates = templates_of(&["{boy} sings.", "{boy} and {girl} dance."]);

        assert_eq!(
            select(&roster, &templates, Options::default()),
            Err(Error::InsufficientParticipants)
        );
    }

    #[test]
    fn test_empty_template_set_reports_insufficient_participants() {
        let roster = roster_of(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);

        assert_eq!(
            select(&roster, &[], Options::default()),
            Err(Error::InsufficientParticipants)
        );
    }

    #[test]
    fn test_ineligible_templates_are_never_drawn() {
        let roster = roster_of(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let templates = templates_of(&["{boy}, {boy} and {boy} pile up.", "{} takes a penalty."]);

        for seed in 0..20 {
            fastrand::seed(seed);
            let resolved = select(&roster, &templates, Options::default()).unwrap();
            assert!(
                resolved.text() == "Alice takes a penalty."
                    || resolved.text() == "Bob takes a penalty.",
                "unexpected resolution: {}",
                resolved.text()
            );
        }
    }

    #[test]
    fn test_any_and_gendered_slots_are_independent() {
        // the only male may fill both the any slot and the boy slot
        let roster = roster_of(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let templates = templates_of(&["{} dares {boy} to do something."]);

        for seed in 0..20 {
            fastrand::seed(seed);
            let resolved = select(&roster, &templates, Options::default()).unwrap();
            assert!(
                resolved.text() == "Alice dares Bob to do something."
                    || resolved.text() == "Bob dares Bob to do something.",
                "unexpected resolution: {}",
                resolved.text()
            );
            assert_eq!(resolved.unresolved(), 0);
        }
    }

    #[test]
    fn test_capped_any_pool_leaves_surplus_markers_literal() {
        let roster = roster_of(&[
            ("Alice", Gender::Female),
            ("Bob", Gender::Male),
            ("Cleo", Gender::Female),
        ]);
        let templates = templates_of(&["{} and {} high-five."]);
        let options = Options {
            any_pool_limit: Some(1),
        };

        fastrand::seed(7);
        let resolved = select(&roster, &templates, options).unwrap();

        assert_eq!(resolved.unresolved(), 1);
        assert!(
            resolved.text().ends_with(" and {} high-five."),
            "unexpected resolution: {}",
            resolved.text()
        );
    }

    #[test]
    fn test_more_any_markers_than_participants() {
        // any markers never make a template ineligible; the surplus stays
        // literal once the whole roster has been consumed
        let roster = roster_of(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let templates = templates_of(&["{}, {} and {} form a jury."]);

        fastrand::seed(3);
        let resolved = select(&roster, &templates, Options::default()).unwrap();

        assert_eq!(resolved.unresolved(), 1);
        assert!(resolved.text().contains("Alice"));
        assert!(resolved.text().contains("Bob"));
        assert!(resolved.text().contains("{}"));
    }

    #[test]
    fn test_any_pool_draws_distinct_participants() {
        let roster = roster_of(&[
            ("Ana", Gender::Female),
            ("Bia", Gender::Female),
            ("Caio", Gender::Male),
        ]);
        let templates = templates_of(&["{} and {} swap seats."]);

        for seed in 0..20 {
            fastrand::seed(seed);
            let resolved = select(&roster, &templates, Options::default()).unwrap();
            let names = ["Ana", "Bia", "Caio"];
            let mentioned = names
                .iter()
                .filter(|name| resolved.text().contains(**name))
                .count();
            assert_eq!(mentioned, 2, "unexpected resolution: {}", resolved.text());
        }
    }

    #[test]
    fn test_options_validation() {
        use garde::Validate;

        assert!(Options { any_pool_limit: None }.validate().is_ok());
        assert!(
            Options {
                any_pool_limit: Some(3)
            }
            .validate()
            .is_ok()
        );
        assert!(
            Options {
                any_pool_limit: Some(0)
            }
            .validate()
            .is_err()
        );
    }
}
