//! Whole-word keyword matching over prompt text.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

/// A compiled, ASCII case-insensitive set of keywords and phrases.
///
/// A hit only counts when it is not embedded in a larger word, so `list`
/// matches "a list of" but not "specialist".
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: Vec<&'static str>,
    automaton: AhoCorasick,
}

impl KeywordSet {
    /// Compile a keyword set.
    ///
    /// # Panics
    ///
    /// Panics if the automaton cannot be built, which only happens for
    /// pathologically large term lists.
    pub fn new(terms: &[&'static str]) -> Self {
        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(terms)
            .expect("keyword automaton builds");
        Self {
            terms: terms.to_vec(),
            automaton,
        }
    }

    /// The first keyword found as a whole word, if any.
    pub fn find_word(&self, text: &str) -> Option<&'static str> {
        self.automaton
            .find_overlapping_iter(text)
            .find(|m| is_word_bounded(text, m.start(), m.end()))
            .map(|m| self.terms[m.pattern().as_usize()])
    }

    /// Whether any keyword occurs as a whole word.
    pub fn contains_word(&self, text: &str) -> bool {
        self.find_word(text).is_some()
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_words_only() {
        let set = KeywordSet::new(&["list", "json"]);
        assert!(set.contains_word("Give me a list of cities."));
        assert!(set.contains_word("Answer in JSON."));
        assert!(!set.contains_word("Ask a specialist."));
        assert!(!set.contains_word("Listen carefully."));
        assert!(!set.contains_word(""));
    }

    #[test]
    fn matches_phrases_case_insensitively() {
        let set = KeywordSet::new(&["no more than", "at most"]);
        assert_eq!(set.find_word("Use No More Than three."), Some("no more than"));
        assert_eq!(set.find_word("at most five"), Some("at most"));
        assert_eq!(set.find_word("atmost"), None);
    }

    #[test]
    fn overlapping_candidates_are_all_considered() {
        // "bullets" is embedded-rejected for "bullet" but still matches itself
        let set = KeywordSet::new(&["bullet", "bullets"]);
        assert_eq!(set.find_word("three bullets"), Some("bullets"));
    }

    #[test]
    fn handles_multibyte_neighbours() {
        let set = KeywordSet::new(&["json"]);
        assert!(set.contains_word("«json»"));
        assert!(!set.contains_word("éjson"));
    }
}
