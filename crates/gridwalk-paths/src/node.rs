use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use gridwalk_core::Point;

/// A search node of [`AStarEngine`](crate::AStarEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AStarNode {
    pub x: i32,
    pub y: i32,
    /// Cost from the start.
    pub g: i32,
    /// Estimated remaining cost.
    pub h: i32,
    /// `g + h`, the priority key.
    pub f: i32,
    pub parent_x: i32,
    pub parent_y: i32,
}

impl AStarNode {
    /// The cell of this node.
    #[inline]
    pub const fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The predecessor cell. The start node is its own parent.
    #[inline]
    pub const fn parent(&self) -> Point {
        Point::new(self.parent_x, self.parent_y)
    }
}

// ---------------------------------------------------------------------------
// Open set
// ---------------------------------------------------------------------------

/// Heap entry ordered by `f`, then by insertion order.
#[derive(Clone, Copy)]
struct OpenEntry {
    node: AStarNode,
    seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.node.f == other.node.f && self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f, oldest first.
        other
            .node
            .f
            .cmp(&self.node.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy)]
struct Live {
    g: i32,
    seq: u64,
}

/// Binary-heap frontier with a position index of the best entry per cell.
///
/// Pushing a better entry for a cell leaves the old one in the heap; it is
/// discarded when popped because the index no longer points at it.
#[derive(Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    live: HashMap<Point, Live>,
    seq: u64,
}

impl OpenSet {
    pub(crate) fn push(&mut self, node: AStarNode) {
        self.seq += 1;
        let seq = self.seq;
        self.live.insert(node.pos(), Live { g: node.g, seq });
        self.heap.push(OpenEntry { node, seq });
    }

    /// Pop the live entry with the smallest `f`.
    pub(crate) fn pop(&mut self) -> Option<AStarNode> {
        while let Some(entry) = self.heap.pop() {
            let pos = entry.node.pos();
            match self.live.get(&pos) {
                Some(live) if live.seq == entry.seq => {
                    self.live.remove(&pos);
                    return Some(entry.node);
                }
                // Superseded by a cheaper entry.
                _ => continue,
            }
        }
        None
    }

    /// Best known `g` of the open entry for `p`.
    #[inline]
    pub(crate) fn best_g(&self, p: Point) -> Option<i32> {
        self.live.get(&p).map(|l| l.g)
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    /// Live `(cell, g)` pairs in no particular order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Point, i32)> + '_ {
        self.live.iter().map(|(&p, l)| (p, l.g))
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.seq = 0;
    }
}

// ---------------------------------------------------------------------------
// Closed set
// ---------------------------------------------------------------------------

/// Expanded nodes in expansion order, indexed by their latest entry per cell.
#[derive(Default)]
pub(crate) struct ClosedSet {
    nodes: Vec<AStarNode>,
    latest: HashMap<Point, usize>,
}

impl ClosedSet {
    pub(crate) fn push(&mut self, node: AStarNode) {
        self.latest.insert(node.pos(), self.nodes.len());
        self.nodes.push(node);
    }

    /// `g` of the most recent closed entry for `p`.
    #[inline]
    pub(crate) fn best_g(&self, p: Point) -> Option<i32> {
        self.latest.get(&p).map(|&i| self.nodes[i].g)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn nodes(&self) -> &[AStarNode] {
        &self.nodes
    }

    /// Walk parent links backwards from the last entry and drop every entry
    /// that is not on that chain. Returns the chain, last entry first.
    pub(crate) fn prune_to_chain(&mut self) -> Vec<AStarNode> {
        let Some(&last) = self.nodes.last() else {
            return Vec::new();
        };
        let mut keep = vec![false; self.nodes.len()];
        keep[self.nodes.len() - 1] = true;
        let mut chain = vec![last];
        let mut cur = last;
        for i in (0..self.nodes.len() - 1).rev() {
            if cur.pos() == cur.parent() {
                break;
            }
            if self.nodes[i].pos() == cur.parent() {
                keep[i] = true;
                cur = self.nodes[i];
                chain.push(cur);
            }
        }

        let mut flags = keep.into_iter();
        self.nodes.retain(|_| flags.next().unwrap_or(false));
        self.latest = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.pos(), i))
            .collect();
        chain
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.latest.clear();
    }
}
