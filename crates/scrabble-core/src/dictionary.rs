//! Dictionary lookup for candidate words.
//!
//! The engine treats word lookup as an external capability behind the
//! [`DictionaryChecker`] trait. [`WordList`] is a plain hash-set
//! implementation that can be built from text, a file, or the small
//! embedded list shipped with the crate.

use crate::placement::Word;
use crate::tiles::{Tile, BLANK_TILES};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Embedded fallback word list, one lowercase word per line
static EMBEDDED_WORDS: &str = include_str!("../data/words.txt");

static EMBEDDED: Lazy<WordList> = Lazy::new(|| WordList::from_text(EMBEDDED_WORDS));

/// Something that can say whether a word exists
pub trait DictionaryChecker {
    fn is_valid_word(&self, text: &str) -> bool;

    /// Whether some word fits `pattern`, where `None` is a blank.
    ///
    /// The default tries every letter in every blank, so callers keep the
    /// number of blanks small. Implementations that can scan their words
    /// should override it.
    fn matches_pattern(&self, pattern: &[Option<char>]) -> bool {
        let mut letters: Vec<char> = pattern.iter().map(|c| c.unwrap_or('A')).collect();
        let blanks: Vec<usize> = pattern
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect();
        resolve_blanks(self, &mut letters, &blanks)
    }
}

impl<D: DictionaryChecker + ?Sized> DictionaryChecker for &D {
    fn is_valid_word(&self, text: &str) -> bool {
        (**self).is_valid_word(text)
    }

    fn matches_pattern(&self, pattern: &[Option<char>]) -> bool {
        (**self).matches_pattern(pattern)
    }
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read word list: {0}")]
    Io(#[from] std::io::Error),

    #[error("Word list is empty")]
    Empty,
}

/// A set of known words, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Build from newline-separated text. Blank lines and lines starting
    /// with `#` are ignored.
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// Load a word list file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        let list = Self::from_text(&text);
        if list.is_empty() {
            return Err(DictionaryError::Empty);
        }
        Ok(list)
    }

    /// The list bundled with the crate
    pub fn embedded() -> &'static WordList {
        &EMBEDDED
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl DictionaryChecker for WordList {
    fn is_valid_word(&self, text: &str) -> bool {
        self.words.contains(&text.to_lowercase())
    }

    /// One pass over the list, comparing letter by letter
    fn matches_pattern(&self, pattern: &[Option<char>]) -> bool {
        self.words.iter().any(|word| {
            word.chars().count() == pattern.len()
                && word.chars().zip(pattern).all(|(w, p)| match p {
                    Some(c) => w.eq_ignore_ascii_case(c),
                    None => w.is_ascii_alphabetic(),
                })
        })
    }
}

/// Check a parsed word, resolving blanks.
///
/// A word with blanks is accepted if some choice of letters for its blanks
/// spells a known word. A word with more blanks than the game has is never
/// accepted. A word without blanks is looked up exactly once.
pub fn accepts_word<D: DictionaryChecker + ?Sized>(dictionary: &D, word: &Word) -> bool {
    let blanks = word.tiles().iter().filter(|t| t.is_blank()).count();
    if blanks == 0 {
        return dictionary.is_valid_word(&word.to_string());
    }
    if blanks > BLANK_TILES {
        return false;
    }

    let pattern: Vec<Option<char>> = word
        .tiles()
        .iter()
        .map(|t| match t {
            Tile::Letter(c) => Some(*c),
            Tile::Blank => None,
        })
        .collect();
    dictionary.matches_pattern(&pattern)
}

fn resolve_blanks<D: DictionaryChecker + ?Sized>(
    dictionary: &D,
    letters: &mut [char],
    blanks: &[usize],
) -> bool {
    match blanks.split_first() {
        None => {
            let text: String = letters.iter().collect();
            dictionary.is_valid_word(&text)
        }
        Some((&idx, rest)) => {
            for c in 'A'..='Z' {
                letters[idx] = c;
                if resolve_blanks(dictionary, letters, rest) {
                    return true;
                }
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let list = WordList::from_text("cat\nDog\n");
        assert!(list.is_valid_word("CAT"));
        assert!(list.is_valid_word("dog"));
        assert!(list.is_valid_word("DoG"));
        assert!(!list.is_valid_word("cow"));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let list = WordList::from_text("# header\n\ncat\n  \n");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_embedded_list_has_bot_words() {
        let list = WordList::embedded();
        for w in ["cat", "dog", "play", "game", "scrabble", "hint", "at"] {
            assert!(list.is_valid_word(w), "missing {}", w);
        }
    }

    #[test]
    fn test_blank_resolution() {
        let list = WordList::from_text("cat\nzoo\n");
        assert!(accepts_word(&list, &Word::parse("C*T").unwrap()));
        assert!(accepts_word(&list, &Word::parse("**O").unwrap()));
        assert!(!accepts_word(&list, &Word::parse("C*X").unwrap()));
    }

    #[test]
    fn test_blank_resolution_through_default_pattern_match() {
        struct Listed(Vec<&'static str>);
        impl DictionaryChecker for Listed {
            fn is_valid_word(&self, text: &str) -> bool {
                self.0.iter().any(|w| w.eq_ignore_ascii_case(text))
            }
        }

        let listed = Listed(vec!["qi", "zoo"]);
        assert!(accepts_word(&listed, &Word::parse("Q*").unwrap()));
        assert!(accepts_word(&listed, &Word::parse("*O*").unwrap()));
        assert!(!accepts_word(&listed, &Word::parse("X*").unwrap()));
    }

    #[test]
    fn test_words_without_blanks_are_looked_up_once() {
        #[derive(Default)]
        struct Counting(std::cell::Cell<usize>);
        impl DictionaryChecker for Counting {
            fn is_valid_word(&self, _text: &str) -> bool {
                self.0.set(self.0.get() + 1);
                false
            }
        }

        let counting = Counting::default();
        assert!(!accepts_word(&counting, &Word::parse("CAT").unwrap()));
        assert_eq!(counting.0.get(), 1);
    }

    #[test]
    fn test_many_blanks_rejected_without_search() {
        let list = WordList::embedded();
        let all_blanks = Word::from_tiles(vec![Tile::Blank; 15]);
        let started = std::time::Instant::now();

        let q_then_blanks = Word::from_tiles(
            std::iter::once(Tile::Letter('Q'))
                .chain(std::iter::repeat(Tile::Blank).take(5))
                .collect(),
        );

        assert!(!accepts_word(list, &all_blanks));
        assert!(!accepts_word(list, &q_then_blanks));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_pattern_scan_respects_length() {
        let list = WordList::from_text("cat\ncats\n");
        assert!(list.matches_pattern(&[Some('C'), None, Some('T')]));
        assert!(!list.matches_pattern(&[Some('C'), None]));
        assert!(list.matches_pattern(&[None, None, None, Some('S')]));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = WordList::load("/definitely/not/here/words.txt");
        assert!(matches!(result, Err(DictionaryError::Io(_))));
    }
}
