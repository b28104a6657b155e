//! Renders the sign of a predicate over a 256x256 patch of consecutive doubles as a PNG:
//! black for negative, grey for zero, white for positive. The naive determinants show
//! the familiar noise along the degenerate line; the exact predicates show a clean split.
use std::cmp::Ordering;
use std::path::Path;

use exact_predicates::{incircle, orientation2d, Coord};

// Directly evaluate the orientation determinant.
fn naive_orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

// Directly evaluate the lifted in-circle determinant relative to the query point.
fn naive_incircle(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, d: Coord<f64>) -> f64 {
    let lifted = |p: Coord<f64>| {
        let (x, y) = (p.x - d.x, p.y - d.y);
        (x, y, x * x + y * y)
    };
    let (ax, ay, al) = lifted(a);
    let (bx, by, bl) = lifted(b);
    let (cx, cy, cl) = lifted(c);

    // same sign convention as the exact predicate
    -(ax * (by * cl - bl * cy) - ay * (bx * cl - bl * cx) + al * (bx * cy - by * cx))
}

fn sign_map<F>(predicate: F, start: Coord<f64>, width: usize, height: usize) -> Vec<Ordering>
where
    F: Fn(Coord<f64>) -> f64,
{
    use float_extras::f64::nextafter;
    let mut yd = start.y;
    let mut data = Vec::with_capacity(width * height);

    for _ in 0..height {
        let mut xd = start.x;
        for _ in 0..width {
            let p = Coord { x: xd, y: yd };
            data.push(predicate(p).partial_cmp(&0.).unwrap_or(Ordering::Equal));
            xd = nextafter(xd, f64::INFINITY);
        }
        yd = nextafter(yd, f64::INFINITY);
    }

    data
}

fn write_png(data: &[Ordering], path: &Path, width: usize, height: usize) -> std::io::Result<()> {
    use std::fs::File;
    use std::io::BufWriter;

    assert_eq!(data.len(), width * height);
    let w = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let pixels = data
        .iter()
        .map(|o| match o {
            Ordering::Less => 0u8,
            Ordering::Equal => 127,
            Ordering::Greater => 255,
        })
        .collect::<Vec<_>>();
    encoder
        .write_header()
        .and_then(|mut writer| writer.write_image_data(&pixels))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn usage(name: &str) -> ! {
    eprintln!(
        "Usage: {} {{naive | exact}} {{incircle | orientation}} <output.png>",
        name
    );
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    if args.len() != 4 {
        usage(&args[0])
    }

    let p1 = Coord { x: 12., y: 12. };
    let p2 = Coord { x: 24., y: 24. };
    let p3 = Coord { x: -12., y: -12. };
    let predicate: Box<dyn Fn(Coord<f64>) -> f64> = match (args[1].as_str(), args[2].as_str()) {
        ("naive", "incircle") => Box::new(|p| naive_incircle(p1, p3, p2, p)),
        ("naive", "orientation") => Box::new(|p| naive_orientation(p1, p, p2)),
        ("exact", "incircle") => Box::new(|p| incircle(p1, p3, p2, p).unwrap_or(f64::NAN)),
        ("exact", "orientation") => Box::new(|p| orientation2d(p1, p, p2).unwrap_or(f64::NAN)),
        _ => usage(&args[0]),
    };

    let data = sign_map(predicate, Coord { x: 0.5, y: 0.5 }, 256, 256);
    if let Err(e) = write_png(&data, Path::new(&args[3]), 256, 256) {
        tracing::error!(error = %e, path = %args[3], "failed to write image");
        std::process::exit(1);
    }
    tracing::info!(path = %args[3], "wrote sign map");
}
