use rand::seq::{IndexedRandom, SliceRandom};
use secret_recovery::{
    decoding::{MAX_BASE, MIN_BASE, encode_point_set},
    recovery::{PointSet, polynomial::Polynomial},
};

const COEFFICIENT_BOUND: i64 = 100;
const IMPOSTER_OFFSET: i64 = 1000;

// This binary generates a random point set record on stdout, each ordinate being
// written in a random base. Imposters are points whose ordinate is shifted away from the curve.
// Run via
// ```
// cargo run --bin generate_point_set -- threshold=<k> points=<n> [imposters=<m>]
// ```
fn main() {
    let threshold = parse_argument("threshold").unwrap_or_else(|| {
        eprintln!("threshold argument is required, e.g., threshold=3");
        std::process::exit(1);
    });
    let points_count = parse_argument("points").unwrap_or(threshold);
    let imposters_count = parse_argument("imposters").unwrap_or(0);

    if threshold == 0 || points_count < threshold {
        eprintln!("threshold must be positive and points must be at least threshold");
        std::process::exit(1);
    }
    if imposters_count > points_count {
        eprintln!("imposters cannot exceed the number of points");
        std::process::exit(1);
    }

    let polynomial = Polynomial::random(threshold - 1, COEFFICIENT_BOUND);
    debug_assert_eq!(polynomial.degree(), threshold - 1);

    let mut xs: Vec<i64> = (1..=(2 * points_count) as i64).collect();
    xs.shuffle(&mut rand::rng());
    xs.truncate(points_count);

    let mut points = polynomial.sample(&xs);
    let mut imposter_xs = vec![];
    for point in points.choose_multiple(&mut rand::rng(), imposters_count) {
        imposter_xs.push(point.x);
    }
    for point in points.iter_mut() {
        if imposter_xs.contains(&point.x) {
            point.y += IMPOSTER_OFFSET;
        }
    }

    let bases: Vec<u32> = (0..points_count)
        .map(|_| rand::random_range(MIN_BASE..=MAX_BASE))
        .collect();

    let point_set = PointSet::new(points_count, threshold, points);
    let record = match encode_point_set(&point_set, &bases) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to encode point set: {e}");
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize point set: {e}");
            std::process::exit(1);
        }
    }

    eprintln!("Secret: {}", polynomial.evaluate_at_zero());
    eprintln!("Imposter abscissas: {imposter_xs:?}");
}

fn parse_argument(name: &str) -> Option<usize> {
    let prefix = format!("{name}=");
    let raw = std::env::args().find(|arg| arg.starts_with(&prefix))?;
    match raw.trim_start_matches(&prefix).trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            eprintln!("invalid {name} argument: {e}");
            std::process::exit(1);
        }
    }
}
