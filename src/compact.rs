//! Compact, position-independent binary encoding of a [`RadixTrie`].
//!
//! The image is a pre-order flattening of the trie. Every node is a
//! `NodeHeader` (`freq: u32 LE`, `nb_children: u64 LE`, then one `u64 LE`
//! child offset per child), and every child is reached through a
//! `ChildDescriptor` (`label_len: u64 LE`, `label_bytes`, then the child's
//! own `NodeHeader`). Every offset is the absolute byte position of the
//! target `ChildDescriptor`, counted from the start of the image (byte 0) —
//! so the image can be read in place from a `&[u8]` (e.g. a memory map)
//! without ever allocating a node, and copying the whole image elsewhere
//! never invalidates a reference inside it.

use std::io::{self, Seek, SeekFrom, Write};

use crate::error::DictError;
use crate::trie::RadixTrie;

const NODE_HEADER_PREFIX: usize = 4 + 8; // freq + nb_children, before the offset table

/// Serialize `trie` to `w` in the compact, offset-based layout.
pub fn write_compact<W: Write + Seek>(trie: &RadixTrie, w: &mut W) -> io::Result<()> {
    write_node(trie, w)
}

fn write_node<W: Write + Seek>(node: &RadixTrie, w: &mut W) -> io::Result<()> {
    w.write_all(&node.freq().to_le_bytes())?;
    w.write_all(&(node.children().len() as u64).to_le_bytes())?;

    let offsets_pos = w.stream_position()?;
    w.write_all(&vec![0u8; node.children().len() * 8])?;

    for (i, edge) in node.children().iter().enumerate() {
        let child_desc_pos = w.stream_position()?;

        w.seek(SeekFrom::Start(offsets_pos + (i as u64) * 8))?;
        w.write_all(&child_desc_pos.to_le_bytes())?;
        w.seek(SeekFrom::Start(child_desc_pos))?;

        w.write_all(&(edge.label.len() as u64).to_le_bytes())?;
        w.write_all(&edge.label)?;
        write_node(&edge.child, w)?;
    }
    Ok(())
}

/// A compact image, held as a borrowed byte slice (typically a memory map).
/// Reading never allocates a node; every accessor indexes directly into the
/// slice.
pub struct CompactTrie<'a> {
    bytes: &'a [u8],
}

impl<'a> CompactTrie<'a> {
    /// Wrap `bytes` as a compact trie image, rejecting anything too short to
    /// even hold a root `NodeHeader` with zero children.
    pub fn new(bytes: &'a [u8]) -> Result<Self, DictError> {
        if bytes.len() < NODE_HEADER_PREFIX {
            return Err(DictError::MalformedImage);
        }
        Ok(CompactTrie { bytes })
    }

    pub fn root(&self) -> CompactCursor<'a> {
        CompactCursor {
            bytes: self.bytes,
            offset: 0,
        }
    }

    pub fn lookup(&self, word: &[u8]) -> u32 {
        self.root().lookup(word)
    }

    /// Every dictionary word in the image, in pre-order.
    pub fn iter(&self) -> Vec<(Vec<u8>, u32)> {
        struct Frame<'a> {
            cursor: CompactCursor<'a>,
            next_edge: usize,
            label_len: usize,
        }

        let mut out = Vec::new();
        let mut prefix = Vec::new();
        let root = self.root();
        if root.freq() > 0 {
            out.push((prefix.clone(), root.freq()));
        }
        let mut stack = vec![Frame {
            cursor: root,
            next_edge: 0,
            label_len: 0,
        }];

        while let Some(top) = stack.last_mut() {
            if top.next_edge >= top.cursor.num_edges() {
                let label_len = top.label_len;
                stack.pop();
                prefix.truncate(prefix.len() - label_len);
                continue;
            }
            let i = top.next_edge;
            top.next_edge += 1;
            let cursor = top.cursor;

            let label = cursor.edge_label(i);
            prefix.extend_from_slice(label);
            let child = cursor.edge_child(i);
            if child.freq() > 0 {
                out.push((prefix.clone(), child.freq()));
            }
            stack.push(Frame {
                cursor: child,
                next_edge: 0,
                label_len: label.len(),
            });
        }
        out
    }
}

/// A read-only cursor into one node of a [`CompactTrie`]'s mapped bytes.
#[derive(Clone, Copy)]
pub struct CompactCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> CompactCursor<'a> {
    fn u32_at(&self, at: usize) -> u32 {
        u32::from_le_bytes(self.bytes[at..at + 4].try_into().unwrap())
    }

    fn u64_at(&self, at: usize) -> u64 {
        u64::from_le_bytes(self.bytes[at..at + 8].try_into().unwrap())
    }

    pub fn freq(&self) -> u32 {
        self.u32_at(self.offset)
    }

    pub fn num_edges(&self) -> usize {
        self.u64_at(self.offset + 4) as usize
    }

    fn child_descriptor_offset(&self, i: usize) -> usize {
        self.u64_at(self.offset + NODE_HEADER_PREFIX + 8 * i) as usize
    }

    pub fn edge_label(&self, i: usize) -> &'a [u8] {
        let desc = self.child_descriptor_offset(i);
        let label_len = self.u64_at(desc) as usize;
        &self.bytes[desc + 8..desc + 8 + label_len]
    }

    pub fn edge_child(&self, i: usize) -> CompactCursor<'a> {
        let desc = self.child_descriptor_offset(i);
        let label_len = self.u64_at(desc) as usize;
        CompactCursor {
            bytes: self.bytes,
            offset: desc + 8 + label_len,
        }
    }

    pub fn lookup(&self, word: &[u8]) -> u32 {
        if word.is_empty() {
            return self.freq();
        }
        for i in 0..self.num_edges() {
            let label = self.edge_label(i);
            if label[0] == word[0] {
                return if word.len() >= label.len() && word[..label.len()] == *label {
                    self.edge_child(i).lookup(&word[label.len()..])
                } else {
                    0
                };
            }
        }
        0
    }
}
