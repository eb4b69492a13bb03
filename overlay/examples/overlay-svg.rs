//! Overlays two surfaces and draws the result of every operation.
//!
//! Each input file holds one surface per block, blocks separated by a line
//! containing `---`. Within a block, one `x y` pair per line, and rings are
//! separated by blank lines: the first ring is the shell, the rest are
//! holes. Lines starting with `#` are ignored.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use svg::Document;

use overlay::{Coordinate, Envelope, Geometry, OverlayOp, PrimitiveRef, Surface};

#[derive(Parser)]
struct Args {
    first: PathBuf,
    second: PathBuf,
    output: PathBuf,

    /// Only draw this operation.
    #[arg(long)]
    op: Option<OverlayOp>,
}

fn parse_surface(block: &str) -> anyhow::Result<Surface> {
    let mut rings: Vec<Vec<Coordinate>> = vec![Vec::new()];
    for line in block.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if rings.last().is_some_and(|r| !r.is_empty()) {
                rings.push(Vec::new());
            }
            continue;
        }
        let mut nums = line.split_whitespace().map(str::parse::<f64>);
        match (nums.next(), nums.next(), nums.next()) {
            (Some(x), Some(y), None) => {
                let c = Coordinate::new(x?, y?);
                // unwrap: there's always at least one ring
                rings.last_mut().unwrap().push(c);
            }
            _ => bail!("expected a coordinate pair, found {line:?}"),
        }
    }
    rings.retain(|r| !r.is_empty());
    let mut rings = rings.into_iter();
    let Some(shell) = rings.next() else {
        bail!("empty surface");
    };
    Ok(Surface {
        shell,
        holes: rings.collect(),
    })
}

fn read_geometry(path: &Path) -> anyhow::Result<Geometry> {
    let input = std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let surfaces = input
        .split("---")
        .filter(|block| block.lines().any(|l| !l.trim().is_empty() && !l.trim().starts_with('#')))
        .map(parse_surface)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Geometry::MultiSurface(surfaces))
}

fn path_data(geometry: &Geometry) -> svg::node::element::path::Data {
    let mut data = svg::node::element::path::Data::new();
    for prim in geometry.primitives() {
        let rings: Vec<&[Coordinate]> = match prim {
            PrimitiveRef::Surface(s) => s.rings().collect(),
            PrimitiveRef::Curve(c) => vec![&c.coords[..]],
            PrimitiveRef::Point(p) => vec![std::slice::from_ref(p)],
        };
        for ring in rings {
            let Some((first, rest)) = ring.split_first() else {
                continue;
            };
            data = data.move_to((first.x, first.y));
            for p in rest {
                data = data.line_to((p.x, p.y));
            }
            if matches!(prim, PrimitiveRef::Surface(_)) {
                data = data.close();
            }
        }
    }
    data
}

fn add_geometry(
    doc: Document,
    geometry: &Geometry,
    dx: f64,
    dy: f64,
    stroke_width: f64,
    fill: &str,
    opacity: f64,
) -> Document {
    let path = svg::node::element::Path::new()
        .set("transform", format!("translate({dx} {dy})"))
        .set("stroke", "black")
        .set("stroke-width", stroke_width)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round")
        .set("fill", fill)
        .set("fill-rule", "evenodd")
        .set("opacity", opacity)
        .set("d", path_data(geometry));
    doc.add(path)
}

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let a = read_geometry(&args.first)?;
    let b = read_geometry(&args.second)?;

    let mut env = a.envelope();
    let b_env = b.envelope();
    if !b_env.is_empty() {
        for corner in [(b_env.min_x, b_env.min_y), (b_env.max_x, b_env.max_y)] {
            env.expand_to_include(&corner.into());
        }
    }
    if env.is_empty() {
        bail!("nothing to draw");
    }
    let Envelope {
        min_x,
        min_y,
        max_x,
        max_y,
    } = env;

    let pad = 1.0;
    let one_width = env.width() + 2.0 * pad;
    let one_height = env.height() + 2.0 * pad;
    let stroke_width = (max_y - min_y).max(max_x - min_x) / 512.0;

    let ops: Vec<OverlayOp> = match args.op {
        Some(op) => vec![op],
        None => OverlayOp::ALL.to_vec(),
    };
    let mut document = Document::new().set(
        "viewBox",
        (
            min_x - pad,
            min_y - pad,
            one_width * (ops.len() + 1) as f64,
            one_height,
        ),
    );

    // The inputs go first, then one panel per operation.
    document = add_geometry(document, &a, 0.0, 0.0, stroke_width, "red", 0.3);
    document = add_geometry(document, &b, 0.0, 0.0, stroke_width, "blue", 0.3);
    for (i, op) in ops.into_iter().enumerate() {
        let result = overlay::overlay(&a, &b, op).with_context(|| format!("computing {op}"))?;
        let dx = one_width * (i + 1) as f64;
        match result {
            Some(result) => {
                eprintln!("{op}: area {}", result.area());
                document = add_geometry(document, &result, dx, 0.0, stroke_width, "green", 0.6);
            }
            None => eprintln!("{op}: empty"),
        }
    }

    svg::save(&args.output, &document)?;
    Ok(())
}
