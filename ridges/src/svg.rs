use crate::{Path, RidgePlot};
use std::io::{self, Write};

/// White outline over a black fill, so nearer rows hide the ones
/// behind them.
pub const DEFAULT_STYLE: &str = "stroke:#ffffff;stroke-width:0.02;stroke-miterlimit:4;\
stroke-dasharray:none;fill:#000000;fill-opacity:1;stroke-opacity:1";

/// Writes `plot` as an SVG 1.1 document, with every path drawn in
/// `style`.
///
/// Paths are placed in a group flipped vertically so north is up and
/// translated so the padded bounds start at the origin.
pub fn write_svg<W: Write>(plot: &RidgePlot, style: &str, mut out: W) -> io::Result<()> {
    let (min, max) = (plot.bounds.min(), plot.bounds.max());
    let width = plot.bounds.width();
    let height = plot.bounds.height();

    writeln!(
        out,
        r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#
    )?;
    writeln!(
        out,
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#
    )?;
    writeln!(
        out,
        r#"<svg viewBox="0 0 {width} {height}" width="{:.0}" height="{:.0}" xmlns="http://www.w3.org/2000/svg">"#,
        100.0 * width,
        100.0 * height
    )?;
    writeln!(
        out,
        r#"  <rect style="fill:#000000;" id="bg" width="{width}" height="{height}" x="0" y="0" />"#
    )?;
    writeln!(
        out,
        r#"  <g id="figure_1" transform="scale(1, -1) translate({} {})">"#,
        -min.x, -max.y
    )?;
    for path in &plot.paths {
        write_path(path, style, &mut out)?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, "</svg>")?;
    out.flush()
}

fn write_path<W: Write>(path: &Path, style: &str, out: &mut W) -> io::Result<()> {
    write!(out, r#"    <path d="M"#)?;
    for point in &path.points {
        write!(out, " {:.3},{:.3}", point.x, point.y)?;
    }
    writeln!(out, r#"" id="{}" style="{style}"/>"#, path.id)
}
