//! Deletion result reporting

use crate::cli::args::OutputFormat;
use crate::error::{PrunerError, Result};
use crate::logging::Logger;
use crate::retention::deleter::DeletionOutcome;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Deletion outcomes split by result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<DeletionOutcome>,
}

impl PruneSummary {
    pub fn partition(outcomes: Vec<DeletionOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                DeletionOutcome::Success { image } => summary.succeeded.push(image),
                failure @ DeletionOutcome::Failure { .. } => summary.failed.push(failure),
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Candidates a dry run would delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunPlan<'a> {
    pub dry_run: bool,
    pub candidates: &'a [String],
}

/// Renders the final report. Text goes through the logger; JSON is written as one
/// document to the report writer (stdout unless replaced).
pub struct Reporter {
    output: Logger,
    format: OutputFormat,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    pub fn new(output: Logger, format: OutputFormat) -> Self {
        Self::with_writer(output, format, Box::new(io::stdout()))
    }

    pub fn with_writer(output: Logger, format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        Self {
            output,
            format,
            writer: Mutex::new(writer),
        }
    }

    /// Partition outcomes and print the result
    pub fn summarize(&self, outcomes: Vec<DeletionOutcome>) -> Result<PruneSummary> {
        let summary = PruneSummary::partition(outcomes);
        self.render(&summary)?;
        Ok(summary)
    }

    pub fn render(&self, summary: &PruneSummary) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(summary),
            OutputFormat::Text => {
                self.output.summary("Deleted images", &summary.succeeded);
                if summary.has_failures() {
                    let failed: Vec<String> =
                        summary.failed.iter().map(ToString::to_string).collect();
                    self.output.list("Failed deletions", &failed);
                }
                Ok(())
            }
        }
    }

    /// Print the images a dry run would delete
    pub fn render_plan(&self, candidates: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(&DryRunPlan {
                dry_run: true,
                candidates,
            }),
            OutputFormat::Text => {
                self.output
                    .summary("Dry run - images that would be deleted", candidates);
                Ok(())
            }
        }
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| PrunerError::Io(io::Error::other("report writer lock poisoned")))?;
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
