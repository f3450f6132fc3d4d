//! Active list (spec.md §4.2): the ordered set of segments currently
//! crossed by the sweep line.
//!
//! Grounded on `active.h`'s `actlist_t` (`#ifdef SPLAY` variant) and the
//! redesign note in spec.md §9 ("use an owning arena with indices"). The
//! doubly linked list (`list_left`/`list_right` on [`Segment`]) is the
//! source of truth for iteration and neighbor queries; the splay tree
//! (`tree_parent`/`tree_left`/`tree_right`) accelerates [`ActiveList::find`].

use std::cmp::Ordering;

use crate::point::GridPoint;
use crate::segment::{Segment, SegIdx};

/// Arena of segments for one sweep invocation. Segments are never removed
/// from the arena while the sweep runs (spec.md §5 "Memory discipline" —
/// the whole arena is released at once when the sweep returns); the active
/// list only tracks which arena slots are currently linked in.
pub type Arena = Vec<Segment>;

#[derive(Debug, Default)]
pub struct ActiveList {
    root: Option<SegIdx>,
    head: Option<SegIdx>,
    tail: Option<SegIdx>,
    size: usize,
}

/// Compares a segment against a probe point pair `(p1, p2)`: `Less` means
/// the segment lies to the left of the probe, `Greater` to the right.
/// Ties (the probe's `p1` lies exactly on the segment's line) are broken
/// by `p2`, matching `actlist_find`'s "(breaking ties w/ p2)".
fn locate(seg: &Segment, p1: GridPoint, p2: GridPoint) -> Ordering {
    let v1 = seg.line_eq(p1);
    if v1 != 0 {
        return if v1 > 0 { Ordering::Less } else { Ordering::Greater };
    }
    let v2 = seg.line_eq(p2);
    if v2 > 0 {
        Ordering::Less
    } else if v2 < 0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl ActiveList {
    pub fn new() -> Self {
        ActiveList::default()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn leftmost(&self) -> Option<SegIdx> {
        self.head
    }

    pub fn rightmost(&self) -> Option<SegIdx> {
        self.tail
    }

    pub fn left_of(&self, arena: &Arena, s: SegIdx) -> Option<SegIdx> {
        arena[s.0].list_left
    }

    pub fn right_of(&self, arena: &Arena, s: SegIdx) -> Option<SegIdx> {
        arena[s.0].list_right
    }

    /// Iterates segments leftmost to rightmost (the linked list, per
    /// spec.md §4.2 "source of truth for iteration").
    pub fn iter<'a>(&self, arena: &'a Arena) -> ActiveIter<'a> {
        ActiveIter {
            arena,
            next: self.head,
        }
    }

    // ---- splay tree primitives -------------------------------------

    fn rotate_left(arena: &mut Arena, x: SegIdx, root: &mut Option<SegIdx>) {
        let y = arena[x.0].tree_right.expect("rotate_left needs a right child");
        let y_left = arena[y.0].tree_left;
        arena[x.0].tree_right = y_left;
        if let Some(yl) = y_left {
            arena[yl.0].tree_parent = Some(x);
        }
        let parent = arena[x.0].tree_parent;
        arena[y.0].tree_parent = parent;
        match parent {
            None => *root = Some(y),
            Some(p) => {
                if arena[p.0].tree_left == Some(x) {
                    arena[p.0].tree_left = Some(y);
                } else {
                    arena[p.0].tree_right = Some(y);
                }
            }
        }
        arena[y.0].tree_left = Some(x);
        arena[x.0].tree_parent = Some(y);
    }

    fn rotate_right(arena: &mut Arena, x: SegIdx, root: &mut Option<SegIdx>) {
        let y = arena[x.0].tree_left.expect("rotate_right needs a left child");
        let y_right = arena[y.0].tree_right;
        arena[x.0].tree_left = y_right;
        if let Some(yr) = y_right {
            arena[yr.0].tree_parent = Some(x);
        }
        let parent = arena[x.0].tree_parent;
        arena[y.0].tree_parent = parent;
        match parent {
            None => *root = Some(y),
            Some(p) => {
                if arena[p.0].tree_left == Some(x) {
                    arena[p.0].tree_left = Some(y);
                } else {
                    arena[p.0].tree_right = Some(y);
                }
            }
        }
        arena[y.0].tree_right = Some(x);
        arena[x.0].tree_parent = Some(y);
    }

    fn splay(arena: &mut Arena, root: &mut Option<SegIdx>, x: SegIdx) {
        loop {
            let p = match arena[x.0].tree_parent {
                None => break,
                Some(p) => p,
            };
            match arena[p.0].tree_parent {
                None => {
                    if arena[p.0].tree_left == Some(x) {
                        Self::rotate_right(arena, p, root);
                    } else {
                        Self::rotate_left(arena, p, root);
                    }
                }
                Some(g) => {
                    let p_is_left_of_g = arena[g.0].tree_left == Some(p);
                    let x_is_left_of_p = arena[p.0].tree_left == Some(x);
                    if p_is_left_of_g == x_is_left_of_p {
                        // zig-zig
                        if x_is_left_of_p {
                            Self::rotate_right(arena, g, root);
                            Self::rotate_right(arena, p, root);
                        } else {
                            Self::rotate_left(arena, g, root);
                            Self::rotate_left(arena, p, root);
                        }
                    } else {
                        // zig-zag
                        if x_is_left_of_p {
                            Self::rotate_right(arena, p, root);
                            Self::rotate_left(arena, g, root);
                        } else {
                            Self::rotate_left(arena, p, root);
                            Self::rotate_right(arena, g, root);
                        }
                    }
                }
            }
        }
        *root = Some(x);
    }

    /// Splays the maximum node of the (detached) subtree rooted at `root`
    /// to the top of that subtree, returning its new root. Used by
    /// `delete` to re-merge the two children of a removed node.
    fn splay_max_of_subtree(arena: &mut Arena, root: SegIdx) -> SegIdx {
        let mut x = root;
        while let Some(r) = arena[x.0].tree_right {
            x = r;
        }
        let mut local_root = Some(root);
        Self::splay(arena, &mut local_root, x);
        local_root.unwrap()
    }

    // ---- queries ------------------------------------------------------

    /// Finds the segment immediately to the left of `p1` (breaking ties
    /// with `p2`), splaying the last node visited during the search to
    /// keep the amortized bound (spec.md §4.2).
    pub fn find(&mut self, arena: &mut Arena, p1: GridPoint, p2: GridPoint) -> Option<SegIdx> {
        let mut cur = self.root;
        let mut candidate = None;
        let mut last_visited = None;
        while let Some(idx) = cur {
            last_visited = Some(idx);
            match locate(&arena[idx.0], p1, p2) {
                Ordering::Greater => cur = arena[idx.0].tree_left,
                _ => {
                    candidate = Some(idx);
                    cur = arena[idx.0].tree_right;
                }
            }
        }
        if let Some(lv) = last_visited {
            Self::splay(arena, &mut self.root, lv);
        }
        candidate
    }

    // ---- mutation -------------------------------------------------------

    /// Inserts `new` immediately after `anchor` in both list and tree.
    /// `anchor = None` inserts `new` as the new leftmost segment.
    fn splice_after(&mut self, arena: &mut Arena, anchor: Option<SegIdx>, new: SegIdx) {
        match anchor {
            None => {
                // New global minimum: every existing node is greater than
                // `new`, so the whole tree becomes `new`'s right subtree
                // without needing to touch its shape.
                arena[new.0].tree_left = None;
                arena[new.0].tree_right = self.root;
                if let Some(r) = self.root {
                    arena[r.0].tree_parent = Some(new);
                }
                arena[new.0].tree_parent = None;
                self.root = Some(new);

                arena[new.0].list_left = None;
                arena[new.0].list_right = self.head;
                if let Some(h) = self.head {
                    arena[h.0].list_left = Some(new);
                }
                self.head = Some(new);
                if self.tail.is_none() {
                    self.tail = Some(new);
                }
            }
            Some(a) => {
                Self::splay(arena, &mut self.root, a);
                let old_right = arena[a.0].tree_right;
                arena[new.0].tree_left = Some(a);
                arena[a.0].tree_parent = Some(new);
                arena[new.0].tree_right = old_right;
                if let Some(r) = old_right {
                    arena[r.0].tree_parent = Some(new);
                }
                arena[a.0].tree_right = None;
                arena[new.0].tree_parent = None;
                self.root = Some(new);

                let after = arena[a.0].list_right;
                arena[new.0].list_left = Some(a);
                arena[new.0].list_right = after;
                arena[a.0].list_right = Some(new);
                match after {
                    Some(n) => arena[n.0].list_left = Some(new),
                    None => self.tail = Some(new),
                }
            }
        }
        self.size += 1;
    }

    /// Inserts a newly-active segment at the position given by its first
    /// two points, per spec.md §4.5 "Start" handling.
    pub fn insert(&mut self, arena: &mut Arena, p1: GridPoint, p2: GridPoint, new: SegIdx) {
        let anchor = self.find(arena, p1, p2);
        self.splice_after(arena, anchor, new);
    }

    /// Removes `s` from both list and tree.
    pub fn delete(&mut self, arena: &mut Arena, s: SegIdx) {
        let before = arena[s.0].list_left;
        let after = arena[s.0].list_right;
        match before {
            Some(b) => arena[b.0].list_right = after,
            None => self.head = after,
        }
        match after {
            Some(a) => arena[a.0].list_left = before,
            None => self.tail = before,
        }
        arena[s.0].list_left = None;
        arena[s.0].list_right = None;

        Self::splay(arena, &mut self.root, s);
        let left = arena[s.0].tree_left;
        let right = arena[s.0].tree_right;
        self.root = match (left, right) {
            (None, None) => None,
            (Some(l), None) => {
                arena[l.0].tree_parent = None;
                Some(l)
            }
            (None, Some(r)) => {
                arena[r.0].tree_parent = None;
                Some(r)
            }
            (Some(l), Some(r)) => {
                arena[l.0].tree_parent = None;
                let new_root = Self::splay_max_of_subtree(arena, l);
                arena[new_root.0].tree_right = Some(r);
                arena[r.0].tree_parent = Some(new_root);
                arena[new_root.0].tree_parent = None;
                Some(new_root)
            }
        };
        arena[s.0].tree_left = None;
        arena[s.0].tree_right = None;
        arena[s.0].tree_parent = None;
        self.size -= 1;
    }

    /// Swaps two currently-adjacent segments, as happens when they cross
    /// (spec.md §4.5 "Cross" handling swaps the pair in the active list).
    pub fn swap_adjacent(&mut self, arena: &mut Arena, s1: SegIdx, s2: SegIdx) {
        let (left, right) = if arena[s1.0].list_right == Some(s2) {
            (s1, s2)
        } else {
            debug_assert_eq!(arena[s2.0].list_right, Some(s1));
            (s2, s1)
        };
        let before = arena[left.0].list_left;
        self.delete(arena, left);
        self.delete(arena, right);
        self.splice_after(arena, before, right);
        self.splice_after(arena, Some(right), left);
    }
}

pub struct ActiveIter<'a> {
    arena: &'a Arena,
    next: Option<SegIdx>,
}

impl<'a> Iterator for ActiveIter<'a> {
    type Item = SegIdx;
    fn next(&mut self) -> Option<SegIdx> {
        let cur = self.next?;
        self.next = self.arena[cur.0].list_right;
        Some(cur)
    }
}
