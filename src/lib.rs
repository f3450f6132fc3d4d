//! `gfxpoly` performs boolean operations on polygons via a Bentley-Ottmann
//! plane sweep over an integer grid, with pluggable winding rules:
//!
//! - Even-odd self-normalization: resolves self-intersections in a single
//!   polygon under the even-odd fill rule.
//! - Union (OR): the resulting polygon contains both inputs.
//! - Intersection (AND): the resulting polygon is contained in both inputs.
//! - Any other winding rule a caller implements via [`WindRule`].
//!
//! The sweep is the core of the crate; [`Polygon`] and [`process`] wrap it
//! behind a convenient entry point, [`Canvas`]/[`from_fill`] build polygons
//! from flattened paths, and [`save`]/[`from_file`] persist them to the
//! original's one-point-per-line text format.

mod active;
mod bbox;
mod convert;
mod error;
mod event;
mod intersect;
mod io;
mod moments;
mod output;
mod point;
mod polygon;
mod segment;
mod sweep;
mod winding;
mod xrow;

pub use bbox::Bbox;
pub use convert::{from_fill, Canvas, PathCommand};
pub use error::{Error, Result};
pub use io::{from_file, from_reader, save, save_to_file};
pub use moments::Moments;
pub use output::Stroke;
pub use point::GridPoint;
pub use polygon::{
    area, intersection_area, process, process_with_custom_rule, process_with_moments, to_lines, Options, Polygon, Rule,
};
pub use winding::{Circular, Direction, EdgeStyle, EvenOdd, Intersect, Union, WindContext, WindRule, WindState};
