//! Configuration for dbbackup
//!
//! All configuration is resolved once at startup (CLI flags with environment
//! fallbacks) into an explicit [`Config`] struct that is passed into each
//! component. Component logic never reads the environment itself.

use std::path::PathBuf;

use chrono::NaiveTime;

use crate::error::{BackupError, BackupResult};

/// Credentials and addresses for the outbound mail channel
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// "From" address, also the SMTP login identity
    pub sender: String,
    /// SMTP login secret
    pub password: String,
    /// Sole "To" address for notifications
    pub recipient: String,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Outbound mail settings
    pub mail: MailConfig,
    /// Destination root for timestamped copies
    pub backup_dir: PathBuf,
    /// Directory scanned for candidate database files
    pub scan_dir: PathBuf,
    /// Wall-clock time at which the daily cycle fires
    pub run_at: NaiveTime,
}

/// Parse the daily run time
///
/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_run_at(value: &str) -> BackupResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            BackupError::Config(format!(
                "Invalid run time {:?}: expected HH:MM or HH:MM:SS",
                value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_at_short_form() {
        let time = parse_run_at("00:00").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_run_at_with_seconds() {
        let time = parse_run_at("12:30:45").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(12, 30, 45).unwrap());
    }

    #[test]
    fn test_parse_run_at_rejects_garbage() {
        let err = parse_run_at("25:99").unwrap_err();
        assert!(matches!(err, BackupError::Config(_)));

        assert!(parse_run_at("noon").is_err());
        assert!(parse_run_at("").is_err());
    }
}
