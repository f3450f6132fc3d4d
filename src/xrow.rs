//! Sorted, deduplicated set of x-coordinates observed on one scanline
//! (spec.md §4.1, grounded on the original `xrow.c`).

/// A binary-search-backed replacement for the original's `qsort` + linear
/// dedup pass: `add` buffers, `finish` sorts once and removes duplicates.
#[derive(Debug, Default, Clone)]
pub struct Xrow {
    x: Vec<i32>,
    sorted: bool,
}

impl Xrow {
    pub fn new() -> Self {
        Xrow {
            x: Vec::with_capacity(16),
            sorted: true,
        }
    }

    /// Records an x coordinate seen at the current scanline.
    pub fn add(&mut self, x: i32) {
        if self.x.last() == Some(&x) {
            return;
        }
        self.x.push(x);
        self.sorted = false;
    }

    fn ensure_sorted(&mut self) {
        if self.sorted {
            return;
        }
        self.x.sort_unstable();
        self.x.dedup();
        self.sorted = true;
    }

    /// Index of the first entry strictly greater than `x` (the original's
    /// `xrow_find`, which binary searches to the same invariant).
    pub fn find(&mut self, x: i32) -> usize {
        self.ensure_sorted();
        self.x.partition_point(|&v| v <= x)
    }

    pub fn contains(&mut self, x: i32) -> bool {
        self.ensure_sorted();
        self.x.binary_search(&x).is_ok()
    }

    pub fn reset(&mut self) {
        self.x.clear();
        self.sorted = true;
    }

    pub fn iter(&mut self) -> impl Iterator<Item = i32> + '_ {
        self.ensure_sorted();
        self.x.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_and_sorts() {
        let mut row = Xrow::new();
        for x in [5, 3, 3, 1, 5, 2] {
            row.add(x);
        }
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn find_returns_upper_bound() {
        let mut row = Xrow::new();
        for x in [0, 10, 20, 30] {
            row.add(x);
        }
        assert_eq!(row.find(-5), 0);
        assert_eq!(row.find(10), 2);
        assert_eq!(row.find(100), 4);
    }

    #[test]
    fn contains_checks_membership() {
        let mut row = Xrow::new();
        row.add(42);
        assert!(row.contains(42));
        assert!(!row.contains(43));
    }
}
