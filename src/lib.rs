use std::{
    env::{self, VarError},
    path::PathBuf,
    str::FromStr,
};
use tracing::Level;

pub mod decoding;
pub mod recovery;

const DEFAULT_TEST_CASES: [&str; 2] = ["testcase1.json", "testcase2.json"];

// ############################################
// ################## CONFIG ##################
// ############################################

pub struct Config {
    pub log_level: Level,
    /// Point set files, processed in order
    pub test_cases: Vec<PathBuf>,
    /// 1-based index of the test case inspected for imposters, defaults to the last one
    pub imposter_case: Option<usize>,
}

impl Config {
    pub fn parse_environment() -> Result<Config, anyhow::Error> {
        let mut errors: Vec<String> = vec![];
        // `LOG_LEVEL` has priority over `RUST_LOG`
        let log_level = match parse_env_variable::<Level>("LOG_LEVEL") {
            Ok(v) => v
                .or_else(|| parse_env_variable::<Level>("RUST_LOG").unwrap_or(None))
                .unwrap_or(Level::INFO),
            Err(e) => {
                errors.push(e.to_string());
                Level::INFO
            }
        };

        let test_cases = match parse_test_cases() {
            Ok(v) => v,
            Err(e) => {
                errors.push(e.to_string());
                vec![]
            }
        };

        let imposter_case = match parse_env_variable::<usize>("IMPOSTER_CASE") {
            Ok(v) => v,
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };

        if !errors.is_empty() {
            return Err(anyhow::anyhow!(errors.join(", ")));
        }

        Ok(Config {
            log_level,
            test_cases,
            imposter_case,
        })
    }

    /// Returns the 1-based index of the test case inspected for imposters.
    pub fn imposter_case_index(&self) -> Result<usize, anyhow::Error> {
        match self.imposter_case {
            None => Ok(self.test_cases.len()),
            Some(i) if (1..=self.test_cases.len()).contains(&i) => Ok(i),
            Some(i) => Err(anyhow::anyhow!(
                "[IMPOSTER_CASE]: {i} is out of range, {} test cases are configured",
                self.test_cases.len()
            )),
        }
    }
}

fn parse_test_cases() -> Result<Vec<PathBuf>, anyhow::Error> {
    let raw_paths = match parse_env_variable::<String>("TEST_CASES")? {
        Some(v) => v,
        None => return Ok(DEFAULT_TEST_CASES.iter().map(PathBuf::from).collect()),
    };
    let test_cases: Vec<PathBuf> = raw_paths
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    if test_cases.is_empty() {
        return Err(anyhow::anyhow!(
            "[TEST_CASES]: must contain at least one path"
        ));
    }
    Ok(test_cases)
}

fn parse_env_variable<T>(key: &str) -> Result<Option<T>, anyhow::Error>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    fn map_err<E>(key: &str, e: E) -> anyhow::Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        anyhow::anyhow!("[{key}]: {e}")
    }

    let env_value = match env::var(key) {
        Ok(v) => {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v))
            }
        }
        Err(e) => {
            if e == VarError::NotPresent {
                Ok(None)
            } else {
                Err(map_err(key, e))
            }
        }
    }?;
    env_value
        .map(|v| v.parse::<T>().map_err(|e| map_err(key, e)))
        .transpose()
}
