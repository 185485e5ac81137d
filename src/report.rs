//! Results aggregation and CSV export.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::session::CaseResult;
use crate::util::mean;

pub const REPORT_FILE_NAME: &str = "radiology_report.csv";
pub const CSV_HEADER: [&str; 4] = ["Image_ID", "Diagnosis", "Time_Seconds", "Timestamp"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode report: {0}")]
    Csv(#[from] csv::Error),
}

/// Headline numbers for the results page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub cases: usize,
    /// `None` when nothing was answered.
    pub mean_secs: Option<f64>,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.cases > 0
    }
}

pub fn summarize(results: &[CaseResult]) -> Summary {
    let times: Vec<f64> = results.iter().map(|r| r.elapsed_secs).collect();
    Summary {
        cases: results.len(),
        mean_secs: mean(&times),
    }
}

/// Serializes every result, in recording order, under the fixed header.
pub fn to_csv(results: &[CaseResult]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // written explicitly so an empty session still gets a header row
    writer.write_record(CSV_HEADER)?;
    for result in results {
        writer.serialize(result)?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

/// Writes the report into `dir` and returns the full path.
pub fn export(results: &[CaseResult], dir: &Path) -> Result<PathBuf, ReportError> {
    let bytes = to_csv(results)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);
    fs::write(&path, bytes)?;
    log::info!("exported {} rows to {}", results.len(), path.display());
    Ok(path)
}
