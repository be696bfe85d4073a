//! Built-in localized challenge catalogs
//!
//! One fixed template set per supported language, written as plain text
//! and scanned lazily on first access. The active language in the session
//! settings decides which set the selector draws from.

use enum_map::{EnumMap, enum_map};
use once_cell_serde::sync::OnceCell;

use super::template::ChallengeTemplate;
use crate::settings::Language;

/// The English challenge set
const ENGLISH: &[&str] = &[
    "Everyone raises a glass to {}.",
    "{} impersonates another player until someone guesses who it is, or takes a penalty.",
    "{} and {} swap seats for the next three rounds.",
    "{} speaks only in rhymes until their next turn, one penalty per slip.",
    "{} tells the group their most useless talent. {} decides whether it earns a penalty or a round of applause.",
    "{} hands out one penalty, no explanations allowed.",
    "{} does a slow-motion replay of the last thing {} did.",
    "{boy} compliments {girl} like a character from a soap opera, or takes two penalties.",
    "{girl} chooses a player to be her echo for the next two rounds.",
    "{boy} lets {} restyle his hair however they want.",
    "{girl} narrates everything {boy} does for the next round, nature-documentary style.",
    "Who is more likely to sleep through an alarm, {boy} or {girl}? The group votes, the loser takes a penalty.",
    "{boy} and {boy} arm-wrestle with their weak arms. The loser takes a penalty.",
    "{girl} and {girl} swap an accessory until the game ends.",
    "Everyone points at the player most likely to become famous. The winner gives out two penalties.",
    "The last player to touch the floor gives out a penalty.",
];

/// The Brazilian Portuguese challenge set
const PORTUGUESE: &[&str] = &[
    "Todos brindam a {}.",
    "{} imita outro jogador até alguém adivinhar quem é, ou recebe uma penalidade.",
    "{} e {} trocam de lugar pelas próximas três rodadas.",
    "{} só fala rimando até a próxima vez que jogar, uma penalidade por deslize.",
    "{} conta ao grupo seu talento mais inútil. {} decide se vale uma penalidade ou uma salva de palmas.",
    "{} distribui uma penalidade, sem dar explicações.",
    "{} refaz em câmera lenta a última coisa que {} fez.",
    "{boy} elogia {girl} como um personagem de novela, ou recebe duas penalidades.",
    "{girl} escolhe um jogador para ser seu eco pelas próximas duas rodadas.",
    "{boy} deixa {} arrumar o cabelo dele do jeito que quiser.",
    "{girl} narra tudo o que {boy} fizer na próxima rodada, em estilo documentário.",
    "Quem tem mais chance de dormir com o alarme tocando, {boy} ou {girl}? O grupo vota, quem perder recebe uma penalidade.",
    "{boy} e {boy} disputam braço de ferro com o braço mais fraco. Quem perder recebe uma penalidade.",
    "{girl} e {girl} trocam um acessório até o fim do jogo.",
    "Todos apontam para o jogador com mais chance de ficar famoso. O vencedor distribui duas penalidades.",
    "O último jogador a tocar o chão distribui uma penalidade.",
];

/// Returns the built-in challenge set for a language
///
/// Sets are scanned once per process and cached; the returned slice is
/// never empty.
pub fn builtin(language: Language) -> &'static [ChallengeTemplate] {
    static PARSED: OnceCell<EnumMap<Language, Vec<ChallengeTemplate>>> = OnceCell::new();
    &PARSED.get_or_init(|| {
        enum_map! {
            Language::English => parse_set(ENGLISH),
            Language::Portuguese => parse_set(PORTUGUESE),
        }
    })[language]
}

/// Scans a set of template texts
fn parse_set(texts: &[&str]) -> Vec<ChallengeTemplate> {
    texts
        .iter()
        .map(|text| {
            ChallengeTemplate::parse(text).expect("built-in challenge templates are well-formed")
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::challenge::template::Marker;

    #[test]
    fn test_catalogs_are_nonempty_and_parse() {
        assert!(!builtin(Language::English).is_empty());
        assert!(!builtin(Language::Portuguese).is_empty());
    }

    #[test]
    fn test_catalogs_have_matching_sizes() {
        assert_eq!(
            builtin(Language::English).len(),
            builtin(Language::Portuguese).len()
        );
    }

    #[test]
    fn test_every_language_has_a_markerless_template() {
        for language in [Language::English, Language::Portuguese] {
            assert!(
                builtin(language)
                    .iter()
                    .any(|template| template.markers().count() == 0),
                "no markerless template for {language:?}"
            );
        }
    }

    #[test]
    fn test_every_language_is_playable_by_a_two_person_roster() {
        // one male plus one female must always find an eligible template
        for language in [Language::English, Language::Portuguese] {
            assert!(
                builtin(language).iter().any(|template| {
                    template.required(Marker::Male) <= 1 && template.required(Marker::Female) <= 1
                }),
                "no playable template for {language:?}"
            );
        }
    }
}
