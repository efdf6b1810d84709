use std::fmt;
use std::path::Path;

use crate::downloader::VideoInfo;
use crate::error::{DownloadError, Result};
use crate::source::DownloadRequest;

/// Terminal result of one request. Built once by the worker that ran it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Position of the request in the submitted batch.
    pub index: usize,
    pub worker: usize,
    pub request: DownloadRequest,
    pub result: std::result::Result<VideoInfo, String>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }

    pub fn info(&self) -> Option<&VideoInfo> {
        self.result.as_ref().ok()
    }
}

/// Outcomes split by success, each side in completion order.
#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    successes: Vec<DownloadOutcome>,
    failures: Vec<DownloadOutcome>,
}

impl ResultSet {
    pub(crate) fn record(&mut self, outcome: DownloadOutcome) {
        if outcome.is_success() {
            self.successes.push(outcome);
        } else {
            self.failures.push(outcome);
        }
    }

    /// Seals the set once `expected` outcomes have been drained.
    pub(crate) fn finish(self, expected: usize) -> Result<ResultSet> {
        let received = self.len();
        if received != expected {
            return Err(DownloadError::IncompleteBatch { expected, received });
        }
        Ok(self)
    }

    pub fn successes(&self) -> &[DownloadOutcome] {
        &self.successes
    }

    pub fn failures(&self) -> &[DownloadOutcome] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn summary<'a>(&'a self, output: &'a Path) -> Summary<'a> {
        Summary {
            results: self,
            output,
        }
    }
}

/// Printable end-of-batch report.
pub struct Summary<'a> {
    results: &'a ResultSet,
    output: &'a Path,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "DOWNLOAD SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total URLs processed: {}", self.results.len())?;
        writeln!(f, "Successful downloads: {}", self.results.successes.len())?;
        writeln!(f, "Failed downloads: {}", self.results.failures.len())?;

        if self.results.has_failures() {
            writeln!(f)?;
            writeln!(f, "Failed downloads:")?;
            for outcome in &self.results.failures {
                writeln!(
                    f,
                    "  - {}: {}",
                    outcome.request.url,
                    outcome.error().unwrap_or_default()
                )?;
            }
        }
        if !self.results.successes.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "All successful downloads saved to: {}",
                self.output.display()
            )?;
        }
        Ok(())
    }
}
