//! Public polygon type and the `process`/`from_fill`/`area` entry points
//! (spec.md §6), grounded on `poly.h`'s `gfxpoly_t` plus the original's
//! `gfxpoly_process`/`gfxpoly_area`/`gfxpoly_intersection_area` signatures.

use crate::bbox::Bbox;
use crate::error::{Error, Result};
use crate::moments::Moments;
use crate::output::Stroke;
use crate::point::GridPoint;
use crate::sweep::{sweep, InputEdge};
use crate::winding::{Circular, EvenOdd, Intersect, Union, WindContext, ONE_POLYGON, TWO_POLYGONS};

/// Configuration shared by every entry point that touches the grid
/// (spec.md §6 "Configuration options recognized across entry points").
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub gridsize: f64,
    pub preserve_direction: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            gridsize: 1.0,
            preserve_direction: false,
        }
    }
}

/// Which winding rule governs a `process` call (spec.md §4.4). Exposed as
/// an enum at the public boundary since the caller picks a rule value at
/// runtime; `sweep` itself stays generic over `WindRule` internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    EvenOdd,
    Circular,
    Intersect,
    Union,
}

/// A polygon: a set of directed, y-monotone strokes plus the gridsize they
/// were quantized under (spec.md §3 "Output polygon").
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    pub(crate) strokes: Vec<Stroke>,
    pub(crate) gridsize: f64,
}

impl Polygon {
    /// An empty polygon at the given gridsize (spec.md §8.2 scenario
    /// "self-union identity" needs an explicit empty operand).
    pub fn empty(gridsize: f64) -> Self {
        Polygon {
            strokes: Vec::new(),
            gridsize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn gridsize(&self) -> f64 {
        self.gridsize
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Bounding box over every point of every stroke, in grid units.
    pub fn bbox(&self) -> Option<Bbox> {
        Bbox::of_points(self.strokes.iter().flat_map(|s| s.points.iter().copied()))
    }

    fn edges(&self) -> Vec<InputEdge> {
        self.strokes
            .iter()
            .flat_map(|s| s.points.windows(2).map(move |w| InputEdge {
                a: w[0],
                b: w[1],
                polygon_idx: 0,
            }))
            .collect()
    }

    /// `process(self, None, rule)`: self-normalizes this polygon alone
    /// (spec.md §6 "`poly2` is optional (null for self-normalization)").
    pub fn process(&self, rule: Rule) -> Result<Polygon> {
        process(self, None, rule)
    }

    /// Area of this polygon under even-odd interpretation (spec.md §6
    /// "Shortcuts that call `process` with a discarded output"). Returns
    /// `NaN` on error, matching the original's infallible convenience
    /// wrapper (spec.md §7 "User-visible behavior").
    pub fn area(&self) -> f64 {
        area(self).unwrap_or(f64::NAN)
    }

    /// Area common to `self` and `other` (spec.md §6). Returns `NaN` on
    /// error.
    pub fn intersection_area(&self, other: &Polygon) -> f64 {
        intersection_area(self, other).unwrap_or(f64::NAN)
    }

    pub fn union(&self, other: &Polygon) -> Result<Polygon> {
        process(self, Some(other), Rule::Union)
    }

    pub fn intersect(&self, other: &Polygon) -> Result<Polygon> {
        process(self, Some(other), Rule::Intersect)
    }
}

fn merged_edges(poly1: &Polygon, poly2: Option<&Polygon>) -> Result<(Vec<InputEdge>, f64, WindContext)> {
    let gridsize = poly1.gridsize;
    if let Some(p2) = poly2 {
        if p2.gridsize != gridsize {
            return Err(Error::InvalidInput(format!(
                "gridsize mismatch: {} vs {}",
                gridsize, p2.gridsize
            )));
        }
    }
    let mut edges = poly1.edges();
    let ctx = if let Some(p2) = poly2 {
        for e in &mut edges {
            e.polygon_idx = 0;
        }
        let mut other = p2.edges();
        for e in &mut other {
            e.polygon_idx = 1;
        }
        edges.extend(other);
        TWO_POLYGONS
    } else {
        ONE_POLYGON
    };
    Ok((edges, gridsize, ctx))
}

fn output_to_polygon(out: crate::sweep::SweepOutput, gridsize: f64) -> Polygon {
    Polygon {
        strokes: out.strokes,
        gridsize,
    }
}

/// `process(poly1, poly2?, rule, context, moments?) → poly` (spec.md §6).
/// `moments` is folded into the return value rather than taken as an
/// out-parameter; callers who need it go through [`process_with_moments`].
pub fn process(poly1: &Polygon, poly2: Option<&Polygon>, rule: Rule) -> Result<Polygon> {
    process_with_moments(poly1, poly2, rule).map(|(poly, _)| poly)
}

/// Runs the sweep and returns both the normalized polygon and its
/// [`Moments`], already scaled to `poly1`'s gridsize.
pub fn process_with_moments(poly1: &Polygon, poly2: Option<&Polygon>, rule: Rule) -> Result<(Polygon, Moments)> {
    let (edges, gridsize, ctx) = merged_edges(poly1, poly2)?;
    let out = match rule {
        Rule::EvenOdd => sweep(&edges, &EvenOdd, &ctx, true)?,
        Rule::Circular => sweep(&edges, &Circular, &ctx, true)?,
        Rule::Intersect => sweep(&edges, &Intersect, &ctx, true)?,
        Rule::Union => sweep(&edges, &Union, &ctx, true)?,
    };
    let mut moments = out.moments.unwrap_or_default();
    moments.normalize(gridsize);
    Ok((output_to_polygon(out, gridsize), moments))
}

/// `process` for a caller-supplied winding rule (spec.md §4.4 "pluggable"),
/// bypassing the built-in [`Rule`] enum entirely.
pub fn process_with_custom_rule(poly1: &Polygon, poly2: Option<&Polygon>, rule: &dyn crate::winding::WindRule) -> Result<Polygon> {
    let (edges, gridsize, ctx) = merged_edges(poly1, poly2)?;
    let out = sweep(&edges, rule, &ctx, false)?;
    Ok(output_to_polygon(out, gridsize))
}

/// `area(poly) → float` (spec.md §6).
pub fn area(poly: &Polygon) -> Result<f64> {
    let (_, moments) = process_with_moments(poly, None, Rule::EvenOdd)?;
    Ok(moments.area)
}

/// `intersection_area(poly1, poly2) → float` (spec.md §6).
pub fn intersection_area(poly1: &Polygon, poly2: &Polygon) -> Result<f64> {
    let (_, moments) = process_with_moments(poly1, Some(poly2), Rule::Intersect)?;
    Ok(moments.area)
}

/// `to_lines(poly, preserve_direction) → line` (spec.md §6): reconstructs
/// a `MoveTo`/`LineTo` path from the stroke list, in user (un-gridded)
/// coordinates. When `preserve_direction` is unset, consecutive strokes
/// sharing an endpoint are stitched into one sub-path to reduce the
/// number of `MoveTo`s; the original's dictionary-based stitch pass is
/// absent from the retrieved source, so this uses a direct linear scan
/// instead (documented in DESIGN.md).
pub fn to_lines(poly: &Polygon, preserve_direction: bool) -> Vec<crate::convert::PathCommand> {
    let mut commands = Vec::new();
    if preserve_direction {
        for stroke in &poly.strokes {
            emit_subpath(&mut commands, stroke, poly.gridsize);
        }
        return commands;
    }

    let mut remaining: Vec<&Stroke> = poly.strokes.iter().collect();
    while !remaining.is_empty() {
        let mut chain: Vec<GridPoint> = remaining.remove(0).points.clone();
        loop {
            let tail = *chain.last().unwrap();
            let next_idx = remaining.iter().position(|s| s.points.first() == Some(&tail));
            if let Some(i) = next_idx {
                let s = remaining.remove(i);
                chain.extend(s.points.iter().skip(1).cloned());
            } else {
                break;
            }
        }
        emit_chain(&mut commands, &chain, poly.gridsize);
    }
    commands
}

fn emit_subpath(commands: &mut Vec<crate::convert::PathCommand>, stroke: &Stroke, gridsize: f64) {
    emit_chain(commands, &stroke.points, gridsize);
}

fn emit_chain(commands: &mut Vec<crate::convert::PathCommand>, points: &[GridPoint], gridsize: f64) {
    use crate::convert::PathCommand;
    if points.is_empty() {
        return;
    }
    let (x0, y0) = points[0].to_real(gridsize);
    commands.push(PathCommand::MoveTo(x0, y0));
    for p in &points[1..] {
        let (x, y) = p.to_real(gridsize);
        commands.push(PathCommand::LineTo(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{Canvas, PathCommand};

    fn square(x0: f64, y0: f64, side: f64, gridsize: f64) -> Polygon {
        let mut canvas = Canvas::new(gridsize);
        canvas.move_to(x0, y0);
        canvas.line_to(x0 + side, y0);
        canvas.line_to(x0 + side, y0 + side);
        canvas.line_to(x0, y0 + side);
        canvas.close();
        canvas.result()
    }

    #[test]
    fn process_self_normalizes_a_simple_square() {
        let p = square(0.0, 0.0, 10.0, 1.0);
        let out = p.process(Rule::EvenOdd).unwrap();
        assert_eq!(out.strokes.len(), 2);
        assert!((out.area() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn area_matches_direct_computation() {
        let p = square(0.0, 0.0, 4.0, 1.0);
        assert!((area(&p).unwrap() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn union_of_disjoint_squares_sums_area() {
        let a = square(0.0, 0.0, 10.0, 1.0);
        let b = square(20.0, 0.0, 10.0, 1.0);
        let u = a.union(&b).unwrap();
        assert!((u.area() - 200.0).abs() < 1e-6);
    }

    #[test]
    fn intersect_of_disjoint_squares_is_empty() {
        let a = square(0.0, 0.0, 10.0, 1.0);
        let b = square(20.0, 0.0, 10.0, 1.0);
        let i = a.intersect(&b).unwrap();
        assert!(i.is_empty());
    }

    #[test]
    fn overlapping_squares_intersection_area() {
        let a = square(0.0, 0.0, 10.0, 1.0);
        let b = square(5.0, 0.0, 10.0, 1.0);
        let area = intersection_area(&a, &b).unwrap();
        assert!((area - 50.0).abs() < 1e-6);
    }

    #[test]
    fn gridsize_mismatch_is_invalid_input() {
        let a = square(0.0, 0.0, 10.0, 1.0);
        let b = square(0.0, 0.0, 10.0, 0.5);
        assert!(matches!(a.intersect(&b), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn to_lines_stitches_single_square_into_one_subpath() {
        let p = square(0.0, 0.0, 10.0, 1.0);
        let out = p.process(Rule::EvenOdd).unwrap();
        let lines = to_lines(&out, false);
        let move_tos = lines.iter().filter(|c| matches!(c, PathCommand::MoveTo(..))).count();
        assert_eq!(move_tos, 1);
    }
}
