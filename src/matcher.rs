//! Approximate lookup: walk a trie while tracking Damerau-Levenshtein
//! distance against a fixed query, over either representation of the trie.
//!
//! The walk itself is written once, against the [`TrieCursor`] trait, so it
//! runs identically over an in-memory [`crate::trie::RadixTrie`] (build/debug
//! path) and over a memory-mapped [`crate::compact::CompactCursor`] (the
//! query-time path). It uses an explicit work stack rather than native
//! recursion, since trie depth is controlled by whatever dictionary the
//! caller loads.

use crate::distance::DlAutomaton;

/// A node with outgoing labeled edges, abstracting over how the trie is
/// stored.
pub trait TrieCursor: Copy {
    fn freq(&self) -> u32;
    fn num_edges(&self) -> usize;
    fn edge_label(&self, i: usize) -> &[u8];
    fn edge_child(&self, i: usize) -> Self;
}

impl TrieCursor for &crate::trie::RadixTrie {
    fn freq(&self) -> u32 {
        crate::trie::RadixTrie::freq(self)
    }
    fn num_edges(&self) -> usize {
        self.children().len()
    }
    fn edge_label(&self, i: usize) -> &[u8] {
        &self.children()[i].label
    }
    fn edge_child(&self, i: usize) -> Self {
        &self.children()[i].child
    }
}

impl<'a> TrieCursor for crate::compact::CompactCursor<'a> {
    fn freq(&self) -> u32 {
        crate::compact::CompactCursor::freq(self)
    }
    fn num_edges(&self) -> usize {
        crate::compact::CompactCursor::num_edges(self)
    }
    fn edge_label(&self, i: usize) -> &[u8] {
        crate::compact::CompactCursor::edge_label(self, i)
    }
    fn edge_child(&self, i: usize) -> Self {
        crate::compact::CompactCursor::edge_child(self, i)
    }
}

/// A dictionary word within `max_distance` of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub word: Vec<u8>,
    pub freq: u32,
    pub distance: u32,
}

struct Frame<T> {
    cursor: T,
    next_edge: usize,
    baselen: usize,
}

/// Every dictionary word reachable from `root` within `max_distance` of
/// `query`, ranked `(distance asc, freq desc, word asc)`.
pub fn matches<T: TrieCursor>(root: T, query: &[u8], max_distance: u32) -> Vec<Match> {
    let mut dl = DlAutomaton::new(query, max_distance);
    let mut word = Vec::new();
    let mut out = Vec::new();

    if root.freq() > 0 && dl.dist() <= max_distance {
        out.push(Match {
            word: word.clone(),
            freq: root.freq(),
            distance: dl.dist(),
        });
    }

    let mut stack = vec![Frame {
        cursor: root,
        next_edge: 0,
        baselen: 0,
    }];

    while let Some(top) = stack.last_mut() {
        if top.next_edge >= top.cursor.num_edges() {
            stack.pop();
            continue;
        }
        let i = top.next_edge;
        top.next_edge += 1;
        let baselen = top.baselen;
        let cursor = top.cursor;

        dl.rollback(baselen);
        word.truncate(baselen);

        let label = cursor.edge_label(i);
        log::trace!(
            "descend edge {i:?} ({:?}) from prefix {:?}",
            String::from_utf8_lossy(label),
            String::from_utf8_lossy(&word)
        );
        let mut in_band = true;
        for &b in label {
            word.push(b);
            let (continue_, _accept) = dl.feed(b);
            if !continue_ {
                log::trace!("prefix {:?} fell out of band, pruning subtree", String::from_utf8_lossy(&word));
                in_band = false;
                break;
            }
        }

        if in_band {
            let child = cursor.edge_child(i);
            let dist = dl.dist();
            if child.freq() > 0 && dist <= max_distance {
                out.push(Match {
                    word: word.clone(),
                    freq: child.freq(),
                    distance: dist,
                });
            }
            stack.push(Frame {
                cursor: child,
                next_edge: 0,
                baselen: word.len(),
            });
        }
    }

    out.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then(b.freq.cmp(&a.freq))
            .then(a.word.cmp(&b.word))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::RadixTrie;

    fn build(words: &[(&str, u32)]) -> RadixTrie {
        let mut trie = RadixTrie::empty();
        for (w, f) in words {
            trie.insert(*f, w.as_bytes());
        }
        trie
    }

    #[test]
    fn exact_match_has_distance_zero() {
        let trie = build(&[("chien", 100), ("chat", 50)]);
        let found = matches(&trie, b"chien", 0);
        assert_eq!(found, vec![Match { word: b"chien".to_vec(), freq: 100, distance: 0 }]);
    }

    #[test]
    fn finds_near_misses_within_budget() {
        let trie = build(&[("chien", 100), ("chiens", 80), ("chat", 50)]);
        let found = matches(&trie, b"chien", 1);
        let words: Vec<_> = found.iter().map(|m| m.word.clone()).collect();
        assert!(words.contains(&b"chien".to_vec()));
        assert!(words.contains(&b"chiens".to_vec()));
        assert!(!words.contains(&b"chat".to_vec()));
    }

    #[test]
    fn worked_example_ranks_exactly() {
        let trie = build(&[("chien", 100), ("chat", 50), ("chiens", 80)]);
        let found = matches(&trie, b"chien", 1);
        assert_eq!(
            found,
            vec![
                Match { word: b"chien".to_vec(), freq: 100, distance: 0 },
                Match { word: b"chiens".to_vec(), freq: 80, distance: 1 },
            ]
        );
    }

    #[test]
    fn excludes_internal_nodes_with_zero_frequency() {
        // "ch" is only an internal split point here, never inserted as a word.
        let trie = build(&[("chien", 100), ("chat", 50)]);
        let found = matches(&trie, b"ch", 2);
        assert!(found.iter().all(|m| m.word != b"ch"));
    }

    #[test]
    fn ranking_is_distance_then_freq_then_word() {
        let trie = build(&[("cat", 10), ("bat", 100), ("hat", 100)]);
        let found = matches(&trie, b"cat", 10000);
        assert_eq!(found[0].word, b"cat");
        // "bat" and "hat" tie on distance and freq; lexicographic order breaks it.
        assert_eq!(found[1].word, b"bat");
        assert_eq!(found[2].word, b"hat");
    }

    #[test]
    fn matches_agree_between_simple_and_compact_representations() {
        let trie = build(&[
            ("chien", 100),
            ("chiens", 80),
            ("chat", 50),
            ("chaton", 30),
            ("chameau", 5),
        ]);
        let mut buf: std::io::Cursor<Vec<u8>> = std::io::Cursor::new(Vec::new());
        crate::compact::write_compact(&trie, &mut buf).unwrap();
        let bytes = buf.into_inner();
        let compact = crate::compact::CompactTrie::new(&bytes).unwrap();

        for query in [&b"chien"[..], b"chat", b"chein", b"xyz"] {
            let mut from_simple = matches(&trie, query, 2);
            let mut from_compact = matches(compact.root(), query, 2);
            from_simple.sort_by(|a, b| a.word.cmp(&b.word));
            from_compact.sort_by(|a, b| a.word.cmp(&b.word));
            assert_eq!(from_simple, from_compact);
        }
    }
}
