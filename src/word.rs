//! Lenient `word freq` tokenizer for dictionary source files.
//!
//! Mirrors the original compiler's `while (!in.eof()) { in >> word; in >> freq; }`
//! loop: tokens are split on any ASCII whitespace, and a trailing token left
//! over at end of input without a matching frequency is silently dropped
//! rather than treated as an error.

use std::io::{self, Read};

/// One `word freq` pair read from a dictionary source.
pub struct Entry {
    pub word: Vec<u8>,
    pub freq: u32,
}

/// Tokenize `r` into whitespace-separated `(word, freq)` pairs.
///
/// Non-numeric frequency tokens are skipped along with their word, so a
/// malformed line costs at most one entry rather than aborting the whole
/// load.
pub fn read_entries<R: Read>(mut r: R) -> io::Result<Vec<Entry>> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    let mut tokens = buf
        .split(|b: &u8| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
        .map(<[u8]>::to_vec);

    let mut entries = Vec::new();
    while let Some(word) = tokens.next() {
        let Some(freq_tok) = tokens.next() else {
            log::warn!(
                "dropping trailing word {:?} with no frequency",
                String::from_utf8_lossy(&word)
            );
            break;
        };
        match std::str::from_utf8(&freq_tok).ok().and_then(|s| s.parse().ok()) {
            Some(freq) => entries.push(Entry { word, freq }),
            None => log::warn!(
                "skipping {:?}: {:?} is not a valid frequency",
                String::from_utf8_lossy(&word),
                String::from_utf8_lossy(&freq_tok)
            ),
        }
    }
    Ok(entries)
}
