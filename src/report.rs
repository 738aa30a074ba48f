//! Notification report composition
//!
//! Builds the subject and plain-text body for one cycle's outcome email.
//! Formatting only; delivery lives in the notify module.

use chrono::NaiveDate;

/// Summary of one backup cycle, used to compose the notification
#[derive(Debug)]
pub enum CycleReport {
    /// At least one candidate existed; lists the per-file outcomes
    Outcome {
        date: NaiveDate,
        succeeded: Vec<String>,
        failed: Vec<String>,
    },
    /// No matching database files were found this cycle
    NoCandidates { date: NaiveDate },
}

impl CycleReport {
    /// Subject line for the notification
    pub fn subject(&self) -> String {
        match self {
            Self::Outcome { date, .. } => {
                format!("Backup result for {}", date.format("%Y-%m-%d"))
            }
            Self::NoCandidates { date } => {
                format!("Backup notice for {}", date.format("%Y-%m-%d"))
            }
        }
    }

    /// Plain-text body for the notification
    ///
    /// Succeeded filenames are listed under a header when non-empty,
    /// followed by failed filenames under a second header when non-empty.
    pub fn body(&self) -> String {
        match self {
            Self::Outcome {
                succeeded, failed, ..
            } => {
                let mut body = String::new();
                if !succeeded.is_empty() {
                    body.push_str("Database files backed up successfully:\n");
                    for name in succeeded {
                        body.push_str(&format!("- {}\n", name));
                    }
                }
                if !failed.is_empty() {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str("Database files that failed to back up:\n");
                    for name in failed {
                        body.push_str(&format!("- {}\n", name));
                    }
                }
                body
            }
            Self::NoCandidates { .. } => {
                "No database files (.sql or .sqlite3) were found to back up.".to_string()
            }
        }
    }
}
