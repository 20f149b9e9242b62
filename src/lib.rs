//! # approxdict
//!
//! Approximate-string lookup over a static, weighted word dictionary.
//!
//! * `trie` builds an in-memory radix (Patricia) trie from `word freq` pairs.
//! * `compact` flattens that trie into a position-independent binary image
//!   that can be memory-mapped and queried without deserializing a single
//!   node.
//! * `matcher` walks either representation with an incremental Damerau-
//!   Levenshtein automaton (`distance`), returning every dictionary word
//!   within a given edit-distance budget.
//! * `word` tokenizes dictionary source files.
//!
//! ## Example
//!
//! ```rs
//! use approxdict::*;
//! let mut trie = trie::RadixTrie::empty();
//! trie.insert(100, b"chien");
//! trie.insert(80, b"chiens");
//! let found = matcher::matches(&trie, b"chein", 2);
//! ```

pub mod compact;
pub mod distance;
pub mod error;
pub mod matcher;
pub mod trie;
pub mod word;

pub use error::DictError;
