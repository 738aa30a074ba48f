//! dbbackup - unattended daily backup of local database files
//!
//! This library implements the backup-and-notify cycle behind the `dbbackup`
//! binary: it discovers `.sql`/`.sqlite3` files in a scan directory, copies
//! them to a timestamped destination with per-file success/failure tracking,
//! and reports the outcome by email, all driven by a once-per-day scheduler
//! that runs until the process is told to stop.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Explicit configuration resolved once at startup
//! - `error`: Typed error taxonomy
//! - `locate`: Candidate discovery (non-recursive directory scan)
//! - `archive`: Metadata-preserving timestamped copies
//! - `report`: Notification subject/body composition
//! - `notify`: SMTP delivery behind a transport seam
//! - `cycle`: One locate -> archive -> notify pass
//! - `schedule`: Daily fire-once scheduler with cancellable waits
//!
//! # Example
//!
//! ```rust,ignore
//! use dbbackup::cycle::run_cycle;
//! use dbbackup::notify::Notifier;
//!
//! let notifier = Notifier::smtp(config.mail.clone())?;
//! let outcome = run_cycle(&config, &notifier)?;
//! ```

pub mod archive;
pub mod config;
pub mod cycle;
pub mod error;
pub mod locate;
pub mod notify;
pub mod report;
pub mod schedule;

pub use error::BackupError;
