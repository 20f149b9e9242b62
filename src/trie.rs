//! Build-time radix (Patricia) trie.
//!
//! Nodes are owned exclusively by their parent (a tree, never a DAG) and are
//! mutated only along the path of an [`insert`](RadixTrie::insert). Nothing
//! here is ever read back from a memory-mapped file — that is
//! [`crate::compact`]'s job; this module only ever allocates real `Node`
//! objects, at build time.

use std::io::{self, Read, Write};

/// One outgoing transition: the bytes consumed traversing it, and the node
/// reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub label: Vec<u8>,
    pub child: Box<RadixTrie>,
}

/// A node in the trie. `freq == 0` means "not itself a dictionary word";
/// `freq > 0` means the path from the root spells a dictionary word with
/// that frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadixTrie {
    pub(crate) freq: u32,
    pub(crate) children: Vec<Edge>,
}

impl Default for RadixTrie {
    fn default() -> Self {
        Self::empty()
    }
}

impl RadixTrie {
    pub fn empty() -> Self {
        RadixTrie {
            freq: 0,
            children: Vec::new(),
        }
    }

    pub fn freq(&self) -> u32 {
        self.freq
    }

    pub fn children(&self) -> &[Edge] {
        &self.children
    }

    fn edge_starting_with(&self, c: u8) -> Option<usize> {
        self.children.iter().position(|e| e.label[0] == c)
    }

    /// Insert `word` with the given frequency, splitting edges as needed to
    /// preserve the radix-compactness and child-disambiguation invariants.
    pub fn insert(&mut self, freq: u32, word: &[u8]) {
        if word.is_empty() {
            self.freq = freq;
            return;
        }

        match self.edge_starting_with(word[0]) {
            None => {
                log::trace!("new edge for {:?}", String::from_utf8_lossy(word));
                self.children.push(Edge {
                    label: word.to_vec(),
                    child: Box::new(RadixTrie {
                        freq,
                        children: Vec::new(),
                    }),
                });
            }
            Some(idx) => {
                let common = common_prefix_len(&self.children[idx].label, word);
                let label_len = self.children[idx].label.len();
                if common == label_len {
                    // Case 2: the edge label is a full prefix of `word`.
                    self.children[idx].child.insert(freq, &word[common..]);
                } else if common == word.len() {
                    // Case 3: `word` is a full prefix of the edge label —
                    // split the edge, the new internal node becomes the word.
                    self.split_edge(idx, common, freq);
                } else {
                    // Case 4: edge label and `word` diverge after a common
                    // prefix — split, and fork a fresh leaf for the tail of
                    // `word`.
                    self.split_edge(idx, common, 0);
                    let tail = &word[common..];
                    self.children[idx].child.children.push(Edge {
                        label: tail.to_vec(),
                        child: Box::new(RadixTrie {
                            freq,
                            children: Vec::new(),
                        }),
                    });
                }
            }
        }
    }

    /// Replace `children[idx]` with an edge carrying `children[idx].label`'s
    /// first `split_at` bytes, leading to a fresh internal node (frequency
    /// `new_freq`) whose only child is the former edge's remainder.
    fn split_edge(&mut self, idx: usize, split_at: usize, new_freq: u32) {
        let old = self.children.remove(idx);
        let (prefix, suffix) = old.label.split_at(split_at);
        let internal = RadixTrie {
            freq: new_freq,
            children: vec![Edge {
                label: suffix.to_vec(),
                child: old.child,
            }],
        };
        self.children.insert(
            idx,
            Edge {
                label: prefix.to_vec(),
                child: Box::new(internal),
            },
        );
    }

    /// Exact-match lookup. Returns 0 if `word` is not a dictionary word.
    pub fn lookup(&self, word: &[u8]) -> u32 {
        if word.is_empty() {
            return self.freq;
        }
        match self.edge_starting_with(word[0]) {
            None => 0,
            Some(idx) => {
                let edge = &self.children[idx];
                if word.len() < edge.label.len() || &word[..edge.label.len()] != &edge.label[..] {
                    0
                } else {
                    edge.child.lookup(&word[edge.label.len()..])
                }
            }
        }
    }

    /// Every dictionary word reachable from this node, in pre-order.
    pub fn iter(&self) -> Vec<(Vec<u8>, u32)> {
        let mut out = Vec::new();
        self.collect_into(&mut Vec::new(), &mut out);
        out
    }

    fn collect_into(&self, prefix: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, u32)>) {
        if self.freq > 0 {
            out.push((prefix.clone(), self.freq));
        }
        for edge in &self.children {
            prefix.extend_from_slice(&edge.label);
            edge.child.collect_into(prefix, out);
            prefix.truncate(prefix.len() - edge.label.len());
        }
    }

    /// A Graphviz `digraph` rendering, labels decoded lossily as UTF-8 for
    /// display only (the trie itself remains byte-exact).
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph RadixTrie {\n");
        let mut counter = 0usize;
        self.write_dot(&mut out, &mut counter, 0);
        out.push_str("}\n");
        out
    }

    fn write_dot(&self, out: &mut String, counter: &mut usize, id: usize) {
        if self.freq > 0 {
            out.push_str(&format!("    n{id} [label=\"{}\"];\n", self.freq));
        } else {
            out.push_str(&format!("    n{id} [label=\"\"];\n"));
        }
        for edge in &self.children {
            *counter += 1;
            let child_id = *counter;
            out.push_str(&format!(
                "    n{id} -> n{child_id} [label=\"{}\"];\n",
                String::from_utf8_lossy(&edge.label)
            ));
            edge.child.write_dot(out, counter, child_id);
        }
    }

    /// Stream-only serialization: `freq, nb_children, then for each child
    /// (label_len, label_bytes, recursive child)`. No explicit offsets — a
    /// reader must walk it top to bottom.
    pub fn serialize_simple<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.freq.to_le_bytes())?;
        w.write_all(&(self.children.len() as u64).to_le_bytes())?;
        for edge in &self.children {
            w.write_all(&(edge.label.len() as u64).to_le_bytes())?;
            w.write_all(&edge.label)?;
            edge.child.serialize_simple(w)?;
        }
        Ok(())
    }

    pub fn deserialize_simple<R: Read>(r: &mut R) -> io::Result<RadixTrie> {
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf4)?;
        let freq = u32::from_le_bytes(buf4);
        r.read_exact(&mut buf8)?;
        let nb_children = u64::from_le_bytes(buf8) as usize;

        let mut children = Vec::with_capacity(nb_children);
        for _ in 0..nb_children {
            r.read_exact(&mut buf8)?;
            let label_len = u64::from_le_bytes(buf8) as usize;
            let mut label = vec![0u8; label_len];
            r.read_exact(&mut label)?;
            let child = Box::new(RadixTrie::deserialize_simple(r)?);
            children.push(Edge { label, child });
        }
        Ok(RadixTrie { freq, children })
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[(&str, u32)]) -> RadixTrie {
        let mut trie = RadixTrie::empty();
        for (w, f) in words {
            trie.insert(*f, w.as_bytes());
        }
        trie
    }

    #[test]
    fn empty_trie_has_no_words() {
        let trie = RadixTrie::empty();
        assert_eq!(trie.lookup(b"anything"), 0);
        assert!(trie.iter().is_empty());
    }

    #[test]
    fn insert_and_lookup_single_word() {
        let trie = build(&[("chien", 100)]);
        assert_eq!(trie.lookup(b"chien"), 100);
        assert_eq!(trie.lookup(b"chie"), 0);
        assert_eq!(trie.lookup(b"chiens"), 0);
    }

    #[test]
    fn edge_split_when_word_is_prefix_of_label() {
        // "chiens" inserted first, then "chien" is a strict prefix of its edge.
        let trie = build(&[("chiens", 80), ("chien", 100)]);
        assert_eq!(trie.lookup(b"chien"), 100);
        assert_eq!(trie.lookup(b"chiens"), 80);
    }

    #[test]
    fn edge_split_on_divergence() {
        let trie = build(&[("chien", 100), ("chat", 50)]);
        assert_eq!(trie.lookup(b"chien"), 100);
        assert_eq!(trie.lookup(b"chat"), 50);
        assert_eq!(trie.lookup(b"ch"), 0);
    }

    #[test]
    fn later_insert_overwrites_frequency() {
        let mut trie = RadixTrie::empty();
        trie.insert(10, b"word");
        trie.insert(20, b"word");
        assert_eq!(trie.lookup(b"word"), 20);
    }

    #[test]
    fn iter_yields_every_word_exactly_once() {
        let trie = build(&[("chien", 100), ("chat", 50), ("chiens", 80)]);
        let mut words: Vec<_> = trie.iter();
        words.sort();
        assert_eq!(
            words,
            vec![
                (b"chat".to_vec(), 50),
                (b"chien".to_vec(), 100),
                (b"chiens".to_vec(), 80),
            ]
        );
    }

    #[test]
    fn simple_round_trip() {
        let trie = build(&[("chien", 100), ("chat", 50), ("chiens", 80), ("chaton", 30)]);
        let mut buf = Vec::new();
        trie.serialize_simple(&mut buf).unwrap();
        let reloaded = RadixTrie::deserialize_simple(&mut &buf[..]).unwrap();
        assert_eq!(trie, reloaded);
    }
}
