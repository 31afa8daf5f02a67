use crate::dictionary::WordLookup;
use crate::letters::LetterPool;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LENGTH: usize = 3;

/// The first rule a word broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    TooShort,
    LetterNotInPool(char),
    NotInDictionary,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::TooShort => write!(f, "words need at least {MIN_LENGTH} letters"),
            InvalidReason::LetterNotInPool(c) => {
                write!(f, "'{}' is not one of today's letters", c.to_ascii_uppercase())
            }
            InvalidReason::NotInDictionary => write!(f, "not in the dictionary"),
        }
    }
}

/// Length, then pool membership, then the dictionary. Case-insensitive.
pub fn check<D: WordLookup + ?Sized>(
    word: &str,
    pool: &LetterPool,
    dictionary: &D,
) -> Result<(), InvalidReason> {
    let word = word.to_lowercase();
    if word.chars().count() < MIN_LENGTH {
        return Err(InvalidReason::TooShort);
    }
    if let Some(c) = word.chars().find(|c| !pool.contains(*c)) {
        return Err(InvalidReason::LetterNotInPool(c));
    }
    if !dictionary.contains(&word) {
        return Err(InvalidReason::NotInDictionary);
    }
    Ok(())
}

pub fn validate<D: WordLookup + ?Sized>(word: &str, pool: &LetterPool, dictionary: &D) -> bool {
    check(word, pool, dictionary).is_ok()
}
