//! Text persistence format (spec.md §6 "Persisted state"), grounded on
//! `convert.c`'s `readline`/`convert_file`/`compactfinish` and the
//! `% gridsize <g>` header convention.

use std::io::{BufRead, BufReader, Read, Write};

use crate::convert::Canvas;
use crate::error::{Error, Result};
use crate::polygon::Polygon;

/// Writes `poly` in the one-point-per-line text format: a `% gridsize <g>`
/// header followed by `x y moveto|lineto` lines, one per stroke point
/// (`compactfinish`'s output, read back by `convert_file`).
pub fn save<W: Write>(poly: &Polygon, mut out: W) -> Result<()> {
    writeln!(out, "% gridsize {}", poly.gridsize()).map_err(io_err)?;
    for stroke in poly.strokes() {
        for (i, p) in stroke.points.iter().enumerate() {
            let (x, y) = p.to_real(poly.gridsize());
            let cmd = if i == 0 { "moveto" } else { "lineto" };
            writeln!(out, "{} {} {}", x, y, cmd).map_err(io_err)?;
        }
    }
    Ok(())
}

/// Parses the text format back into a [`Polygon`] (`convert_file`'s
/// `sscanf("%lf %lf %s", ...)` / `"%% gridsize %lf"` pair). Lines the
/// original's `readline` would have produced are read with `BufRead::lines`,
/// which correctly strips the line terminator — see SPEC_FULL.md's Open
/// Question resolution for why this departs from `readline`'s literal (and
/// buggy) `c != 10 || c != 13` condition.
pub fn from_reader<R: Read>(reader: R) -> Result<Polygon> {
    let reader = BufReader::new(reader);
    let mut gridsize = 1.0f64;
    let mut canvas = Canvas::new(gridsize);
    let mut any_gridsize_seen = false;

    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("% gridsize") {
            let g: f64 = rest
                .trim()
                .parse()
                .map_err(|_| Error::InvalidInput(format!("bad gridsize header: {}", line)))?;
            gridsize = g;
            canvas = retarget(canvas, gridsize);
            any_gridsize_seen = true;
            continue;
        }
        let mut parts = line.split_whitespace();
        let x: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::InvalidInput(format!("bad line: {}", line)))?;
        let y: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::InvalidInput(format!("bad line: {}", line)))?;
        let cmd = parts.next().ok_or_else(|| Error::InvalidInput(format!("bad line: {}", line)))?;
        match cmd {
            "moveto" => canvas.move_to(x, y),
            "lineto" => canvas.line_to(x, y),
            other => return Err(Error::InvalidInput(format!("invalid command: {}", other))),
        }
    }
    let _ = any_gridsize_seen;
    Ok(canvas.result())
}

/// Re-creates a [`Canvas`] at a new gridsize, replaying nothing: the
/// original rebinds `gridsize` mid-stream via `setgridsize` without
/// re-quantizing points already written, so a header seen after points
/// have been added only affects points from that point on. Canvas holds
/// no un-flushed points, so this is simply a fresh canvas at the new scale.
fn retarget(_old: Canvas, gridsize: f64) -> Canvas {
    Canvas::new(gridsize)
}

fn io_err(e: std::io::Error) -> Error {
    Error::Io(e.to_string())
}

/// Convenience wrapper over [`from_reader`] for a path on disk
/// (`gfxpoly_from_file`).
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Polygon> {
    let file = std::fs::File::open(path).map_err(io_err)?;
    from_reader(file)
}

/// Convenience wrapper over [`save`] for a path on disk.
pub fn save_to_file<P: AsRef<std::path::Path>>(poly: &Polygon, path: P) -> Result<()> {
    let file = std::fs::File::create(path).map_err(io_err)?;
    save(poly, file)
}
