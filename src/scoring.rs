use std::collections::HashSet;

/// Ten points for every letter beyond the first use of each distinct letter.
///
/// Words with no repeated letter score zero whatever their length.
pub fn score(word: &str) -> u32 {
    let length = word.chars().count();
    let distinct = word.chars().collect::<HashSet<_>>().len();
    10 * (length - distinct) as u32
}
