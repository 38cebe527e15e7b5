//! Word to part-of-speech lookup built from a plain text dictionary.
//!
//! Each line starts with the headword followed by an abbreviated word type,
//! e.g. `Abandon v. 1 give up completely.` Lines whose second token is not a
//! known abbreviation are skipped, and the first entry for a word wins.

use std::fmt;
use std::path::{Path, PathBuf};

use quarry_hashlist::LinkedHashList;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordType {
    Noun,
    Verb,
    Adverb,
    Adjective,
    Conjunction,
    Abbreviation,
    Preposition,
    Pronoun,
    Interjection,
}

impl WordType {
    /// Maps a lower-case dictionary abbreviation.
    pub fn from_code(code: &str) -> Option<WordType> {
        Some(match code {
            "n" => WordType::Noun,
            "v" => WordType::Verb,
            "adv" => WordType::Adverb,
            "adj" => WordType::Adjective,
            "conj" => WordType::Conjunction,
            "abbr" => WordType::Abbreviation,
            "prep" => WordType::Preposition,
            "pron" => WordType::Pronoun,
            "int" => WordType::Interjection,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordType::Noun => "noun",
            WordType::Verb => "verb",
            WordType::Adverb => "adverb",
            WordType::Adjective => "adjective",
            WordType::Conjunction => "conjunction",
            WordType::Abbreviation => "abbreviation",
            WordType::Preposition => "preposition",
            WordType::Pronoun => "pronoun",
            WordType::Interjection => "interjection",
        }
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased words in file order.
#[derive(Default)]
pub struct Dictionary {
    words: LinkedHashList<String, WordType>,
}

/// Alphanumeric runs of `line`.
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
}

impl Dictionary {
    pub fn parse(text: &str) -> Self {
        let mut words = LinkedHashList::new();
        for line in text.lines() {
            let mut t = tokens(line);
            let (Some(word), Some(code)) = (t.next(), t.next()) else {
                continue;
            };
            let Some(kind) = WordType::from_code(&code.to_ascii_lowercase()) else {
                continue;
            };
            let word = word.to_ascii_lowercase();
            if !words.contains_key(&word) {
                words.insert(word, kind);
            }
        }
        Self { words }
    }

    /// Case-insensitive lookup.
    pub fn word_type(&self, word: &str) -> Option<WordType> {
        self.words.get(&word.to_ascii_lowercase()).copied()
    }

    /// Type name of `word`, or `"unknown"`.
    pub fn describe(&self, word: &str) -> &'static str {
        self.word_type(word).map_or("unknown", WordType::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, WordType)> + '_ {
        self.words.iter().map(|(w, t)| (w.as_str(), *t))
    }
}

pub fn load_dictionary(path: impl AsRef<Path>) -> Result<Dictionary, DictionaryError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dict = Dictionary::parse(&String::from_utf8_lossy(&bytes));
    log::info!("loaded {} words from {}", dict.len(), path.display());
    Ok(dict)
}
