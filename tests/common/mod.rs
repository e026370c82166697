use std::path::PathBuf;

use num_bigint::BigInt;
use secret_recovery::{
    decoding::read_point_set,
    recovery::{Point, PointSet},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[allow(dead_code)]
pub fn setup_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(LevelFilter::WARN))
        .try_init();
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[allow(dead_code)]
pub fn load_fixture(name: &str) -> Result<PointSet, anyhow::Error> {
    setup_tracing();
    read_point_set(fixture_path(name))
}

#[allow(dead_code)]
pub fn point(x: i64, y: i64) -> Point {
    Point::new(x, BigInt::from(y))
}
