//! Incremental Optimal String Alignment Damerau-Levenshtein distance.
//!
//! The automaton is built once for a fixed query word `Q` and a fixed maximum
//! distance `k`, then extended one byte at a time along a dynamically growing
//! candidate prefix `P`. Extending and rolling back share the same flat DP
//! table, so sibling subtrees of a trie walk can reuse the work done on their
//! common ancestor path instead of recomputing it from scratch.

/// Distances above this are known to exceed any `max_distance` a caller would
/// reasonably pass, and never collide with a real in-band distance. Chosen
/// well below `u32::MAX` so that `sentinel + 1` never overflows.
pub const SENTINEL: u32 = u32::MAX >> 1;

/// Incremental banded OSA Damerau-Levenshtein DP table.
///
/// `Q` (the query) is fixed at construction. `P` (`current()`) grows and
/// shrinks via [`feed`](Self::feed) and [`rollback`](Self::rollback).
pub struct DlAutomaton<'q> {
    query: &'q [u8],
    max_distance: u32,
    current: Vec<u8>,
    /// Row-major, `(current.len() + 1)` rows of `query.len() + 1` columns
    /// each, appended as `feed` extends `current`.
    rows: Vec<u32>,
}

impl<'q> DlAutomaton<'q> {
    pub fn new(query: &'q [u8], max_distance: u32) -> Self {
        let width = query.len() + 1;
        let mut rows = Vec::with_capacity(width * 4);
        rows.extend((0..width as u32).map(|j| j));
        DlAutomaton {
            query,
            max_distance,
            current: Vec::new(),
            rows,
        }
    }

    fn width(&self) -> usize {
        self.query.len() + 1
    }

    fn cell(&self, row: usize, col: usize) -> u32 {
        self.rows[row * self.width() + col]
    }

    /// The candidate prefix accumulated so far (`P`).
    pub fn current(&self) -> &[u8] {
        &self.current
    }

    /// `M[|P|][|Q|]`, or [`SENTINEL`] if the band never covered that cell.
    pub fn dist(&self) -> u32 {
        self.cell(self.current.len(), self.query.len())
    }

    /// Append `c` to `P`, extending the DP table by one row.
    ///
    /// Returns `(continue, accept)`: `continue` is `false` once no cell in
    /// the new row is within `max_distance`, meaning no descendant of this
    /// prefix can ever come back into band; `accept` is `true` when `P`
    /// itself is within `max_distance` of `Q`.
    pub fn feed(&mut self, c: u8) -> (bool, bool) {
        let width = self.width();
        let i = self.current.len() + 1;
        self.current.push(c);

        let k = self.max_distance as usize;
        let lb = i.saturating_sub(k + 1);
        let rb = self.query.len().min(i + k);

        let mut row = vec![SENTINEL; width];
        for j in lb..=rb {
            row[j] = if j == 0 {
                i as u32
            } else {
                let delete = self.cell(i - 1, j).saturating_add(1);
                let insert = row[j - 1].saturating_add(1);
                let sub_cost = u32::from(self.current[i - 1] != self.query[j - 1]);
                let mut best = delete.min(insert).min(self.cell(i - 1, j - 1) + sub_cost);
                if i >= 2
                    && j >= 2
                    && self.current[i - 2] == self.query[j - 1]
                    && self.current[i - 1] == self.query[j - 2]
                {
                    best = best.min(self.cell(i - 2, j - 2) + 1);
                }
                best
            };
        }

        let continue_ = row[lb..=rb].iter().any(|&v| v <= self.max_distance);
        let accept = row[self.query.len()] <= self.max_distance;
        self.rows.extend_from_slice(&row);
        (continue_, accept)
    }

    /// Truncate `P` back to length `n`, discarding every row beyond it.
    pub fn rollback(&mut self, n: usize) {
        debug_assert!(n <= self.current.len());
        log::trace!("rollback from {} to {n}", self.current.len());
        self.current.truncate(n);
        self.rows.truncate((n + 1) * self.width());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(query: &str, candidate: &str, max_distance: u32) -> u32 {
        let mut dl = DlAutomaton::new(query.as_bytes(), max_distance);
        for &c in candidate.as_bytes() {
            dl.feed(c);
        }
        dl.dist()
    }

    #[test]
    fn trivial_distances() {
        assert_eq!(distance("hello", "hello", 10000), 0);
        assert_eq!(distance("hello", "", 10000), 5);
        assert_eq!(distance("", "hello", 10000), 5);
    }

    #[test]
    fn concrete_scenarios() {
        assert_eq!(distance("azertyuiop", "aeryuop", 10000), 3);
        assert_eq!(distance("aeryuop", "azertyuiop", 10000), 3);
        assert_eq!(
            distance(
                "azertyuiopqsdfghjklmwxcvbn,",
                "qwertyuiopasdfghjkl;zxcvbnm",
                10000
            ),
            6
        );
        assert_eq!(distance("1234567890", "1324576809", 10000), 3);
    }

    #[test]
    fn banding_returns_sentinel_once_exceeded() {
        assert!(distance("azertyuiop", "aeryuop", 2) > 2);
        assert!(distance("aeryuop", "azertyuiop", 0) > 0);
        assert_eq!(distance("azertyuiop", "aeryuop", 3), 3);
        assert_eq!(distance("azertyuiop", "aeryuop", 4), 3);
    }

    #[test]
    fn banding_matches_unbounded_when_in_budget() {
        assert_eq!(distance("1234567890", "1324576809", 5), 3);
        assert_eq!(distance("1234567890", "1324576809", 3), 3);
    }

    #[test]
    fn rollback_restores_earlier_state() {
        let mut dl = DlAutomaton::new("chien".as_bytes(), 10000);
        for &c in b"niche" {
            dl.feed(c);
        }
        assert_eq!(dl.dist(), 4);

        dl.rollback(4);
        for &c in b"ien" {
            dl.feed(c);
        }
        assert_eq!(dl.dist(), 2);

        dl.rollback(0);
        for &c in b"chien" {
            dl.feed(c);
        }
        assert_eq!(dl.dist(), 0);
    }

    #[test]
    fn rollback_reproduces_identical_distance() {
        let mut dl = DlAutomaton::new("xylophone".as_bytes(), 10000);
        for &c in b"xyl" {
            dl.feed(c);
        }
        for &c in b"ophone" {
            dl.feed(c);
        }
        let full = dl.dist();

        dl.rollback(3);
        for &c in b"ophone" {
            dl.feed(c);
        }
        assert_eq!(dl.dist(), full);
    }

    #[test]
    fn single_adjacent_swap_is_near_symmetric() {
        let (a, b) = ("abcdef", "acbdef");
        let d_ab = distance(a, b, 10000);
        let d_ba = distance(b, a, 10000);
        assert!((d_ab as i64 - d_ba as i64).abs() <= 1);
        assert_eq!(d_ab, 1);
    }
}
