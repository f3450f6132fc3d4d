//! Pluggable winding rules (spec.md §4.4), grounded directly on the
//! original `wind.c` / `wind.h`.

/// Direction a segment had in the input path before the sweep reordered it.
/// As the sweep moves from low y to high y, `Down` means the original
/// segment's end point had a larger y than its start point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[inline]
    pub fn invert(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Opaque handle identifying how an edge is painted. Winding rules compare
/// handles by value to decide whether two edges "cancel" (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeStyle(pub u32);

/// The default (and, for the built-in rules, only) edge style: "this is a
/// boundary edge", with no further painting information. Mirrors the
/// original's single file-scope `edgestyle_default`.
pub const EDGESTYLE_DEFAULT: EdgeStyle = EdgeStyle(0);

/// `(is_filled, wind_nr)` state to the left of the sweep line at a given x.
/// `wind_nr` is rule-specific: a signed winding counter for `circular`, or a
/// polygon-membership bitmask for `intersect`/`union`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindState {
    pub is_filled: bool,
    pub wind_nr: i32,
}

/// The state at x = -infinity on every scanline.
pub const WINDSTATE_NONFILLED: WindState = WindState {
    is_filled: false,
    wind_nr: 0,
};

/// Configuration shared by all calls to `add`/`diff` in one sweep.
#[derive(Debug, Clone, Copy)]
pub struct WindContext {
    pub num_polygons: u32,
}

pub const ONE_POLYGON: WindContext = WindContext { num_polygons: 1 };
pub const TWO_POLYGONS: WindContext = WindContext { num_polygons: 2 };

/// A pluggable winding rule: the policy that maps a set of edges crossing a
/// horizontal ray to a boolean "is this cell filled" (spec.md glossary).
///
/// Implementations must be pure: `add`/`diff` may not mutate the states
/// they are given, only derive new ones.
pub trait WindRule {
    fn start(&self, ctx: &WindContext) -> WindState;
    fn add(
        &self,
        ctx: &WindContext,
        left: WindState,
        edge: EdgeStyle,
        dir: Direction,
        polygon_idx: u32,
    ) -> WindState;
    fn diff(&self, left: &WindState, right: &WindState) -> Option<EdgeStyle>;
}

fn boundary_iff_fill_differs(left: &WindState, right: &WindState) -> Option<EdgeStyle> {
    if left.is_filled == right.is_filled {
        None
    } else {
        Some(EDGESTYLE_DEFAULT)
    }
}

/// Toggles `is_filled` on every edge, regardless of direction or polygon.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenOdd;

impl WindRule for EvenOdd {
    fn start(&self, _ctx: &WindContext) -> WindState {
        WINDSTATE_NONFILLED
    }
    fn add(
        &self,
        _ctx: &WindContext,
        mut left: WindState,
        _edge: EdgeStyle,
        _dir: Direction,
        _polygon_idx: u32,
    ) -> WindState {
        left.is_filled = !left.is_filled;
        left
    }
    fn diff(&self, left: &WindState, right: &WindState) -> Option<EdgeStyle> {
        boundary_iff_fill_differs(left, right)
    }
}

/// Non-zero winding rule: `wind_nr` increments on `Down` edges and
/// decrements on `Up` edges; filled iff `wind_nr != 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circular;

impl WindRule for Circular {
    fn start(&self, _ctx: &WindContext) -> WindState {
        WINDSTATE_NONFILLED
    }
    fn add(
        &self,
        _ctx: &WindContext,
        mut left: WindState,
        _edge: EdgeStyle,
        dir: Direction,
        _polygon_idx: u32,
    ) -> WindState {
        match dir {
            Direction::Down => left.wind_nr += 1,
            Direction::Up => left.wind_nr -= 1,
        }
        left.is_filled = left.wind_nr != 0;
        left
    }
    fn diff(&self, left: &WindState, right: &WindState) -> Option<EdgeStyle> {
        boundary_iff_fill_differs(left, right)
    }
}

/// Intersection of `num_polygons` polygons: each polygon toggles its own bit
/// in `wind_nr`; filled iff every bit is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersect;

impl WindRule for Intersect {
    fn start(&self, _ctx: &WindContext) -> WindState {
        WINDSTATE_NONFILLED
    }
    fn add(
        &self,
        ctx: &WindContext,
        mut left: WindState,
        _edge: EdgeStyle,
        _dir: Direction,
        polygon_idx: u32,
    ) -> WindState {
        debug_assert!(polygon_idx < ctx.num_polygons);
        left.wind_nr ^= 1 << polygon_idx;
        left.is_filled = left.wind_nr == (1 << ctx.num_polygons) - 1;
        left
    }
    fn diff(&self, left: &WindState, right: &WindState) -> Option<EdgeStyle> {
        boundary_iff_fill_differs(left, right)
    }
}

/// Union of polygons: each polygon toggles its own bit in `wind_nr`; filled
/// iff any bit is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Union;

impl WindRule for Union {
    fn start(&self, _ctx: &WindContext) -> WindState {
        WINDSTATE_NONFILLED
    }
    fn add(
        &self,
        _ctx: &WindContext,
        mut left: WindState,
        _edge: EdgeStyle,
        _dir: Direction,
        polygon_idx: u32,
    ) -> WindState {
        debug_assert!((polygon_idx as usize) < std::mem::size_of::<i32>() * 8);
        left.wind_nr ^= 1 << polygon_idx;
        left.is_filled = left.wind_nr != 0;
        left
    }
    fn diff(&self, left: &WindState, right: &WindState) -> Option<EdgeStyle> {
        boundary_iff_fill_differs(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evenodd_toggles() {
        let rule = EvenOdd;
        let ctx = ONE_POLYGON;
        let s0 = rule.start(&ctx);
        assert!(!s0.is_filled);
        let s1 = rule.add(&ctx, s0, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert!(s1.is_filled);
        let s2 = rule.add(&ctx, s1, EDGESTYLE_DEFAULT, Direction::Up, 0);
        assert!(!s2.is_filled);
    }

    #[test]
    fn circular_direction_cancels() {
        let rule = Circular;
        let ctx = ONE_POLYGON;
        let s0 = rule.start(&ctx);
        let s1 = rule.add(&ctx, s0, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert!(s1.is_filled);
        let s2 = rule.add(&ctx, s1, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert_eq!(s2.wind_nr, 2);
        let s3 = rule.add(&ctx, s2, EDGESTYLE_DEFAULT, Direction::Up, 0);
        assert_eq!(s3.wind_nr, 1);
    }

    #[test]
    fn intersect_needs_every_polygon() {
        let rule = Intersect;
        let ctx = TWO_POLYGONS;
        let s0 = rule.start(&ctx);
        let s1 = rule.add(&ctx, s0, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert!(!s1.is_filled);
        let s2 = rule.add(&ctx, s1, EDGESTYLE_DEFAULT, Direction::Down, 1);
        assert!(s2.is_filled);
    }

    #[test]
    fn union_needs_any_polygon() {
        let rule = Union;
        let ctx = TWO_POLYGONS;
        let s0 = rule.start(&ctx);
        let s1 = rule.add(&ctx, s0, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert!(s1.is_filled);
        let s2 = rule.add(&ctx, s1, EDGESTYLE_DEFAULT, Direction::Down, 0);
        assert!(!s2.is_filled);
    }

    #[test]
    fn diff_is_none_when_fill_matches() {
        let rule = EvenOdd;
        let a = WindState { is_filled: true, wind_nr: 0 };
        let b = WindState { is_filled: true, wind_nr: 5 };
        assert_eq!(rule.diff(&a, &b), None);
    }
}
