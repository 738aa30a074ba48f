//! One backup-and-notify cycle
//!
//! Runs locate -> archive -> notify, fully sequential and synchronous, and
//! returns the per-file outcomes so the caller can summarize them.

use chrono::Local;

use crate::archive::{ArchiveFailure, ArchiveSuccess, Archiver};
use crate::config::Config;
use crate::error::BackupResult;
use crate::locate;
use crate::notify::{MailTransport, Notifier};
use crate::report::CycleReport;

/// Aggregate outcome of one cycle
#[derive(Debug)]
pub struct CycleOutcome {
    /// Candidates copied into the backup directory
    pub successes: Vec<ArchiveSuccess>,
    /// Candidates that could not be copied
    pub failures: Vec<ArchiveFailure>,
    /// Whether the notification was delivered
    pub notified: bool,
}

/// Run one full backup-and-notify cycle
///
/// When the scan turns up no candidates at all, a distinct notification is
/// sent and the archiver's copy path is never entered.
pub fn run_cycle<T: MailTransport>(
    config: &Config,
    notifier: &Notifier<T>,
) -> BackupResult<CycleOutcome> {
    let now = Local::now();
    let candidates = locate::find_candidates(&config.scan_dir)?;

    if candidates.is_empty() {
        println!("No database files found to back up.");
        let report = CycleReport::NoCandidates {
            date: now.date_naive(),
        };
        let notified = notifier.notify(&report.subject(), &report.body());
        return Ok(CycleOutcome {
            successes: Vec::new(),
            failures: Vec::new(),
            notified,
        });
    }

    let archiver = Archiver::new(&config.backup_dir);
    let (successes, failures) = archiver.archive(&config.scan_dir, &candidates, now)?;

    let report = CycleReport::Outcome {
        date: now.date_naive(),
        succeeded: successes.iter().map(|s| s.filename.clone()).collect(),
        failed: failures.iter().map(|f| f.filename.clone()).collect(),
    };
    let notified = notifier.notify(&report.subject(), &report.body());

    Ok(CycleOutcome {
        successes,
        failures,
        notified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailConfig;
    use crate::error::{BackupError, BackupResult};
    use lettre::Message;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default, Clone)]
    struct RecordingMailer {
        sent: Rc<RefCell<Vec<String>>>,
    }

    impl MailTransport for RecordingMailer {
        fn send(&self, message: &Message) -> BackupResult<()> {
            let raw = String::from_utf8_lossy(&message.formatted()).to_string();
            self.sent.borrow_mut().push(raw);
            Ok(())
        }
    }

    struct FailingMailer;

    impl MailTransport for FailingMailer {
        fn send(&self, _message: &Message) -> BackupResult<()> {
            Err(BackupError::Network("connection refused".into()))
        }
    }

    fn test_config(scan_dir: PathBuf, backup_dir: PathBuf) -> Config {
        Config {
            mail: MailConfig {
                sender: "ops@example.com".into(),
                password: "secret".into(),
                recipient: "admin@example.com".into(),
            },
            backup_dir,
            scan_dir,
            run_at: chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_cycle_archives_and_notifies() {
        let scan_dir = TempDir::new().unwrap();
        let backup_root = TempDir::new().unwrap();
        fs::write(scan_dir.path().join("a.sql"), b"data").unwrap();
        fs::create_dir(scan_dir.path().join("broken.sqlite3")).unwrap();

        let config = test_config(
            scan_dir.path().to_path_buf(),
            backup_root.path().join("backups"),
        );
        let transport = RecordingMailer::default();
        let sent = transport.sent.clone();
        let notifier = Notifier::new(config.mail.clone(), transport);

        let outcome = run_cycle(&config, &notifier).unwrap();

        assert_eq!(outcome.successes.len(), 1);
        assert_eq!(outcome.successes[0].filename, "a.sql");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].filename, "broken.sqlite3");
        assert!(outcome.notified);

        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Backup result for"));
        assert!(sent[0].contains("a.sql"));
        assert!(sent[0].contains("broken.sqlite3"));
    }

    #[test]
    fn test_zero_candidates_sends_distinct_notice() {
        let scan_dir = TempDir::new().unwrap();
        let backup_root = TempDir::new().unwrap();
        fs::write(scan_dir.path().join("readme.txt"), b"not a database").unwrap();

        let backup_dir = backup_root.path().join("backups");
        let config = test_config(scan_dir.path().to_path_buf(), backup_dir.clone());
        let transport = RecordingMailer::default();
        let sent = transport.sent.clone();
        let notifier = Notifier::new(config.mail.clone(), transport);

        let outcome = run_cycle(&config, &notifier).unwrap();

        assert!(outcome.successes.is_empty());
        assert!(outcome.failures.is_empty());
        assert!(outcome.notified);

        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("No database files"));
        // The copy path is never entered, so the backup directory is
        // never created either.
        assert!(!backup_dir.exists());
    }

    #[test]
    fn test_failed_send_does_not_fail_the_cycle() {
        let scan_dir = TempDir::new().unwrap();
        let backup_root = TempDir::new().unwrap();
        fs::write(scan_dir.path().join("a.sql"), b"data").unwrap();

        let config = test_config(
            scan_dir.path().to_path_buf(),
            backup_root.path().join("backups"),
        );
        let notifier = Notifier::new(config.mail.clone(), FailingMailer);

        let outcome = run_cycle(&config, &notifier).unwrap();

        assert_eq!(outcome.successes.len(), 1);
        assert!(!outcome.notified);
    }

    #[test]
    fn test_missing_scan_directory_is_cycle_fatal() {
        let backup_root = TempDir::new().unwrap();
        let config = test_config(
            backup_root.path().join("gone"),
            backup_root.path().join("backups"),
        );
        let notifier = Notifier::new(config.mail.clone(), RecordingMailer::default());

        let err = run_cycle(&config, &notifier).unwrap_err();
        assert!(err.is_io());
    }
}
