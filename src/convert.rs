//! Path-to-polygon conversion (spec.md §6 `from_fill`/`canvas`), grounded
//! directly on `convert.c`'s `convert_gfxline`/`compactmoveto`/
//! `compactlineto`/`polydraw_*` family.

use crate::point::GridPoint;
use crate::polygon::Polygon;
use crate::winding::Direction;

/// One drawing command in a flattened path (spec.md §6 `from_fill` input
/// contract). Mirrors `gfxline_t`'s `moveTo`/`lineTo`/`splineTo` variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Quadratic Bezier to `(x, y)` via control point `(sx, sy)`.
    SplineTo(f64, f64, f64, f64),
}

/// Number of line fragments `convert_gfxline`/`polydraw_splineTo` flatten a
/// quadratic spline into: `SUBFRACTION` in the original.
const SUBFRACTION: f64 = 2.4;

fn spline_parts(last: (f64, f64), ctrl: (f64, f64), end: (f64, f64)) -> usize {
    let c = (end.0 - 2.0 * ctrl.0 + last.0).abs() + (end.1 - 2.0 * ctrl.1 + last.1).abs();
    let parts = (c.sqrt() * SUBFRACTION) as usize;
    parts.max(1)
}

/// Evaluates the quadratic Bezier `last -> ctrl -> end` at `t` (spec.md §6
/// `⌈√(|Δ²x| + |Δ²y|) · 2.4⌉` flattening, one point per fragment boundary).
fn spline_point(last: (f64, f64), ctrl: (f64, f64), end: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    (
        end.0 * t * t + 2.0 * ctrl.0 * t * mt + last.0 * mt * mt,
        end.1 * t * t + 2.0 * ctrl.1 * t * mt + last.1 * mt * mt,
    )
}

/// Flattens a path of [`PathCommand`]s into a flat sequence of `(x, y)`
/// vertices per sub-path, splitting at each `MoveTo` (spec.md §6
/// `from_fill` contract). Grounded on `convert_gfxline`'s single pass over
/// a `gfxline_t` chain.
fn flatten(commands: &[PathCommand]) -> Vec<Vec<(f64, f64)>> {
    let mut subpaths: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut last = (0.0, 0.0);
    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(x, y) => {
                subpaths.push(vec![(x, y)]);
                last = (x, y);
            }
            PathCommand::LineTo(x, y) => {
                if let Some(sp) = subpaths.last_mut() {
                    sp.push((x, y));
                } else {
                    subpaths.push(vec![last, (x, y)]);
                }
                last = (x, y);
            }
            PathCommand::SplineTo(sx, sy, x, y) => {
                let parts = spline_parts(last, (sx, sy), (x, y));
                let sp = if let Some(sp) = subpaths.last_mut() {
                    sp
                } else {
                    subpaths.push(vec![last]);
                    subpaths.last_mut().unwrap()
                };
                let step = 1.0 / parts as f64;
                for i in 0..parts {
                    let t = i as f64 * step;
                    sp.push(spline_point(last, (sx, sy), (x, y), t));
                }
                sp.push((x, y));
                last = (x, y);
            }
        }
    }
    subpaths
}

/// Converts a flattened subpath's vertices into grid-quantized
/// [`crate::output::Stroke`]s, splitting each run of points into maximal
/// monotone-direction runs the way `compactlineto` does (a new stroke
/// starts whenever direction reverses, matching the original's
/// `dir != data->dir` check).
fn subpath_to_strokes(points: &[(f64, f64)], gridsize: f64) -> Vec<crate::output::Stroke> {
    let grid: Vec<GridPoint> = points.iter().map(|&(x, y)| GridPoint::quantize(x, y, gridsize)).collect();

    let mut strokes = Vec::new();
    let mut current: Vec<GridPoint> = Vec::new();
    let mut current_dir: Option<Direction> = None;

    for w in grid.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        if p0 == p1 {
            continue;
        }
        let dir = if p1 > p0 { Direction::Down } else { Direction::Up };
        if Some(dir) != current_dir {
            if current.len() >= 2 {
                strokes.push(finish_stroke(std::mem::take(&mut current), current_dir.unwrap()));
            }
            current.clear();
            current.push(p0);
            current_dir = Some(dir);
        }
        current.push(p1);
    }
    if current.len() >= 2 {
        strokes.push(finish_stroke(current, current_dir.unwrap()));
    }
    strokes
}

fn finish_stroke(points: Vec<GridPoint>, dir: Direction) -> crate::output::Stroke {
    use crate::output::Stroke;
    use crate::winding::EDGESTYLE_DEFAULT;
    // `compactlineto` stores points start-to-end and only reverses the
    // array for DIR_UP strokes so that every stored stroke reads top to
    // bottom (spec.md §3 "Output polygon": points strictly increasing y).
    let ordered = match dir {
        Direction::Down => points,
        Direction::Up => points.into_iter().rev().collect(),
    };
    Stroke {
        points: ordered,
        dir,
        edge_style: EDGESTYLE_DEFAULT,
    }
}

/// `from_fill(line, gridsize) → poly` (spec.md §6).
pub fn from_fill(commands: &[PathCommand], gridsize: f64) -> Polygon {
    let mut strokes = Vec::new();
    for subpath in flatten(commands) {
        strokes.extend(subpath_to_strokes(&subpath, gridsize));
    }
    Polygon {
        strokes,
        gridsize,
    }
}

/// `canvas(gridsize) → canvas` (spec.md §6): a builder with `moveTo`,
/// `lineTo`, `splineTo`, `close`, `result`, grounded on `polydraw_moveTo`/
/// `polydraw_lineTo`/`polydraw_splineTo`/`polydraw_close`. Tracks the
/// current point and the sub-path's start point for `close`, and silently
/// drops commands that would produce a degenerate (zero-length) stroke,
/// matching the original's `lastx != x || lasty != y` guards.
#[derive(Debug, Clone)]
pub struct Canvas {
    gridsize: f64,
    commands: Vec<PathCommand>,
    current: Option<(f64, f64)>,
    subpath_start: Option<(f64, f64)>,
}

impl Canvas {
    pub fn new(gridsize: f64) -> Self {
        Canvas {
            gridsize,
            commands: Vec::new(),
            current: None,
            subpath_start: None,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.current != Some((x, y)) {
            self.commands.push(PathCommand::MoveTo(x, y));
        }
        self.current = Some((x, y));
        self.subpath_start = Some((x, y));
    }

    /// A `lineTo` with no preceding `moveTo` degrades to a `moveTo`
    /// (`polydraw_lineTo`'s `if(!i->last) { polydraw_moveTo(...); return; }`).
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        if self.current != Some((x, y)) {
            self.commands.push(PathCommand::LineTo(x, y));
        }
        self.current = Some((x, y));
    }

    pub fn spline_to(&mut self, sx: f64, sy: f64, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.commands.push(PathCommand::SplineTo(sx, sy, x, y));
        self.current = Some((x, y));
    }

    /// Closes the current sub-path with a line back to its `moveTo` point,
    /// if not already there (`polydraw_close`).
    pub fn close(&mut self) {
        if let (Some(cur), Some(start)) = (self.current, self.subpath_start) {
            if cur != start {
                self.commands.push(PathCommand::LineTo(start.0, start.1));
                self.current = Some(start);
            }
        }
        self.current = None;
    }

    /// Finishes the canvas and converts its accumulated commands
    /// (`polydraw_result`, which defers to the same writer `from_fill`
    /// uses).
    pub fn result(self) -> Polygon {
        from_fill(&self.commands, self.gridsize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_path_produces_two_vertical_strokes() {
        let poly = from_fill(
            &[
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(10.0, 0.0),
                PathCommand::LineTo(10.0, 10.0),
                PathCommand::LineTo(0.0, 10.0),
                PathCommand::LineTo(0.0, 0.0),
            ],
            1.0,
        );
        // Both horizontal edges collapse (dir flips are only tracked for
        // non-degenerate steps); the two verticals each form one stroke.
        assert_eq!(poly.strokes.len(), 2);
        for s in &poly.strokes {
            assert!(s.points.windows(2).all(|w| w[0].y <= w[1].y));
        }
    }

    #[test]
    fn canvas_close_appends_return_to_start() {
        let mut canvas = Canvas::new(1.0);
        canvas.move_to(0.0, 0.0);
        canvas.line_to(5.0, 0.0);
        canvas.line_to(5.0, 5.0);
        canvas.close();
        let poly = canvas.result();
        assert!(!poly.strokes.is_empty());
        let bbox = poly.bbox().unwrap();
        assert_eq!(bbox.left, 0);
        assert_eq!(bbox.right, 5);
    }

    #[test]
    fn spline_flattens_into_at_least_one_fragment() {
        let poly = from_fill(
            &[
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::SplineTo(5.0, 10.0, 10.0, 0.0),
                PathCommand::LineTo(0.0, 0.0),
            ],
            1.0,
        );
        assert!(!poly.strokes.is_empty());
    }

    #[test]
    fn degenerate_lineto_to_current_point_is_dropped() {
        let mut canvas = Canvas::new(1.0);
        canvas.move_to(0.0, 0.0);
        canvas.line_to(0.0, 0.0);
        canvas.line_to(10.0, 0.0);
        let poly = canvas.result();
        // The dropped zero-length step means only one real segment exists.
        let total_points: usize = poly.strokes.iter().map(|s| s.points.len()).sum();
        assert!(total_points <= 2);
    }
}
