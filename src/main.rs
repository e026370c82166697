use std::path::{Path, PathBuf};

use dotenvy::dotenv;
use secret_recovery::{
    Config,
    decoding::read_point_set,
    recovery::{Point, PointSet},
};
use tracing::{debug, error, info, info_span, level_filters::LevelFilter};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

// Recovers the secret of every test case and lists the imposter points of one of them.
// Run via
// ```
// cargo run -- <testcase1.json> <testcase2.json> ...
// ```
// Without arguments, test cases are read from the `TEST_CASES` environment variable.
fn main() -> Result<(), anyhow::Error> {
    if let Err(err) = dotenv()
        && !err.not_found()
    {
        return Err(anyhow::anyhow!("Error while loading .env file: {err}"));
    }

    let mut config = match Config::parse_environment() {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to parse environment variables for configuration: {e}"
            ));
        }
    };

    let cli_test_cases: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !cli_test_cases.is_empty() {
        config.test_cases = cli_test_cases;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(Into::<LevelFilter>::into(config.log_level)),
        )
        .init();

    let imposter_case = config.imposter_case_index()?;

    let mut failures = 0;
    for (i, path) in config.test_cases.iter().enumerate() {
        let case_number = i + 1;
        let _span = info_span!("test_case", case_number, path = %path.display()).entered();

        if let Err(e) = process_test_case(path, case_number, case_number == imposter_case) {
            error!("Test case {case_number} failed: {e}");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "{failures} out of {} test cases failed",
            config.test_cases.len()
        ));
    }

    info!("All {} test cases processed", config.test_cases.len());

    Ok(())
}

fn process_test_case(
    path: &Path,
    case_number: usize,
    find_imposters: bool,
) -> Result<(), anyhow::Error> {
    let point_set: PointSet = read_point_set(path)?;
    debug!(
        "Decoded {} points, n = {}, k = {}",
        point_set.points.len(),
        point_set.n,
        point_set.k
    );

    let secret = point_set.recover_secret()?;
    println!("Secret (c) from Test Case {case_number}: {secret}");

    if find_imposters {
        let report = point_set.find_imposters()?;
        info!(
            "{} consistent points, {} imposters",
            report.consistent.len(),
            report.imposters.len()
        );
        println!(
            "Imposter Points in Test Case {case_number}: {}",
            format_points(&report.imposters)
        );
    }

    Ok(())
}

fn format_points(points: &[Point]) -> String {
    let points = points
        .iter()
        .map(Point::to_string)
        .collect::<Vec<String>>()
        .join(", ");
    format!("[{points}]")
}
