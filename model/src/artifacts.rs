//! Locating result artifacts under a matrix's result storage.
//!
//! Results are written as `<matrix>/<shard>/<device>/.../<file>` beneath the
//! storage root, with JUnit output named `test_result_<n>.xml`.

use crate::error::{ModelError, ModelResult};
use regex::Regex;

pub const TEST_RESULT_PATTERN: &str = r".*test_result_\d+\.xml$";

/// A result object path split into its well-known components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    pub file_name: String,
    pub object_name: String,
    pub shard_name: String,
    pub device_name: String,
}

impl ObjectPath {
    pub fn parse(path: &str) -> ModelResult<Self> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        if parts.len() < 3 {
            return Err(ModelError::InvalidObjectPath {
                path: path.to_string(),
            });
        }

        Ok(Self {
            file_name: parts[parts.len() - 1].to_string(),
            object_name: parts[0].to_string(),
            shard_name: parts[1].to_string(),
            device_name: parts[2].to_string(),
        })
    }
}

/// Matches artifact paths worth downloading: JUnit results plus any
/// caller-supplied patterns.
#[derive(Debug, Clone)]
pub struct ArtifactMatcher {
    test_result: Regex,
    extra: Vec<Regex>,
}

impl ArtifactMatcher {
    /// Matches JUnit results only.
    pub fn test_results() -> ModelResult<Self> {
        Self::new(std::iter::empty::<&str>())
    }

    pub fn new<I, S>(patterns: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let test_result = Regex::new(TEST_RESULT_PATTERN)?;
        let extra = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { test_result, extra })
    }

    pub fn is_test_result(&self, path: &str) -> bool {
        self.test_result.is_match(path)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.is_test_result(path) || self.extra.iter().any(|re| re.is_match(path))
    }

    pub fn patterns(&self) -> Vec<&str> {
        std::iter::once(&self.test_result)
            .chain(&self.extra)
            .map(Regex::as_str)
            .collect()
    }
}
