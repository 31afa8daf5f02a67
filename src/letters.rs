use crate::date_key::DateKey;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const POOL_SIZE: usize = 5;
pub const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];
const MIN_VOWELS: usize = 1;
const MAX_VOWELS: usize = 3;
const SEED_MULTIPLIER: u32 = 1009;

const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// English letter frequency, in hundredths of a percent, indexed like `ALPHABET`.
const FREQUENCIES: [u32; 26] = [
    812, 149, 271, 432, 1202, 230, 203, 592, 731, 10, 69, 398, 261, 695, 768, 182, 11, 602, 628,
    910, 288, 111, 209, 17, 211, 7,
];

/// How letters are drawn for a pool.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LetterDraw {
    /// Letters weighted by English frequency
    #[default]
    Weighted,
    /// Every letter equally likely
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    WrongSize(usize),
    NotALetter(char),
    Repeated(char),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::WrongSize(n) => write!(f, "a pool needs {POOL_SIZE} letters, got {n}"),
            PoolError::NotALetter(c) => write!(f, "'{c}' is not a letter"),
            PoolError::Repeated(c) => write!(f, "'{c}' appears more than once"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Five distinct lowercase letters, kept sorted. Only [`LetterPool::from_letters`]
/// and the generators build one; pools are derived from the date and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterPool([char; POOL_SIZE]);

impl LetterPool {
    pub fn from_letters(letters: &[char]) -> Result<Self, PoolError> {
        if letters.len() != POOL_SIZE {
            return Err(PoolError::WrongSize(letters.len()));
        }
        let mut pool = ['a'; POOL_SIZE];
        for (i, c) in letters.iter().enumerate() {
            let c = c.to_ascii_lowercase();
            if !c.is_ascii_lowercase() {
                return Err(PoolError::NotALetter(c));
            }
            if pool[..i].contains(&c) {
                return Err(PoolError::Repeated(c));
            }
            pool[i] = c;
        }
        pool.sort_unstable();
        Ok(Self(pool))
    }

    pub fn letters(&self) -> &[char; POOL_SIZE] {
        &self.0
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn vowel_count(&self) -> usize {
        self.0.iter().filter(|c| VOWELS.contains(c)).count()
    }
}

impl fmt::Display for LetterPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upper: Vec<String> = self.0.iter().map(|c| c.to_ascii_uppercase().to_string()).collect();
        write!(f, "{}", upper.join(" "))
    }
}

/// Folds the `-` separated segments of the key: `acc = acc * 1009 + segment`,
/// starting from 1, wrapping at 32 bits.
pub fn seed_from_key(key: &DateKey) -> u32 {
    key.to_string()
        .split('-')
        .map(|part| part.parse::<u32>().unwrap_or(0))
        .fold(1u32, |acc, part| {
            acc.wrapping_mul(SEED_MULTIPLIER).wrapping_add(part)
        })
}

/// Mulberry32: a 32-bit state generator with a fixed output sequence per seed.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Maps a 32-bit draw onto `[0, n)` without floating point.
fn bounded(x: u32, n: u32) -> u32 {
    ((x as u64 * n as u64) >> 32) as u32
}

fn draw_letter<R: RngCore>(rng: &mut R, draw: LetterDraw) -> char {
    match draw {
        LetterDraw::Uniform => ALPHABET[bounded(rng.next_u32(), ALPHABET.len() as u32) as usize],
        LetterDraw::Weighted => {
            let total: u32 = FREQUENCIES.iter().sum();
            let r = bounded(rng.next_u32(), total);
            let mut cumulative = 0;
            for (letter, weight) in ALPHABET.iter().zip(FREQUENCIES.iter()) {
                cumulative += weight;
                if r < cumulative {
                    return *letter;
                }
            }
            ALPHABET[ALPHABET.len() - 1]
        }
    }
}

/// Draws until five distinct letters with 1..=3 vowels come out of `rng`.
pub fn draw_pool<R: RngCore>(rng: &mut R, draw: LetterDraw) -> LetterPool {
    loop {
        let mut picked: Vec<char> = Vec::with_capacity(POOL_SIZE);
        while picked.len() < POOL_SIZE {
            let c = draw_letter(rng, draw);
            if !picked.contains(&c) {
                picked.push(c);
            }
        }
        let vowels = picked.iter().filter(|c| VOWELS.contains(c)).count();
        if (MIN_VOWELS..=MAX_VOWELS).contains(&vowels) {
            picked.sort_unstable();
            let mut letters = ['a'; POOL_SIZE];
            letters.copy_from_slice(&picked);
            return LetterPool(letters);
        }
    }
}

/// The pool every player gets for `key`.
pub fn generate(key: &DateKey, draw: LetterDraw) -> LetterPool {
    let mut rng = Mulberry32::new(seed_from_key(key));
    draw_pool(&mut rng, draw)
}

/// A throwaway pool for practice play, seeded from the thread rng.
pub fn practice_pool(draw: LetterDraw) -> LetterPool {
    draw_pool(&mut rand::thread_rng(), draw)
}
