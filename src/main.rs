use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dbbackup::config::{parse_run_at, Config, MailConfig};
use dbbackup::cycle::run_cycle;
use dbbackup::notify::{Notifier, RELAY_HOST};
use dbbackup::schedule::{Scheduler, Shutdown, SystemClock};

#[derive(Parser)]
#[command(
    name = "dbbackup",
    version,
    about = "Daily backup of local database files with email reporting",
    long_about = "dbbackup scans a directory for .sql and .sqlite3 files once a day, \
                  copies them to a backup directory under timestamped names, and \
                  emails a summary of the outcome to a configured recipient."
)]
struct Cli {
    /// Sender address and SMTP login identity
    #[arg(long, env = "EMAIL_SENDER")]
    sender: String,

    /// SMTP login secret
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    password: String,

    /// Recipient address for outcome notifications
    #[arg(long, env = "EMAIL_RECEIVER")]
    recipient: String,

    /// Destination root for timestamped copies
    #[arg(long, env = "BACKUP_DIR")]
    backup_dir: PathBuf,

    /// Directory scanned for database files
    #[arg(long, env = "BACKUP_SCAN_DIR", default_value = ".")]
    scan_dir: PathBuf,

    /// Daily run time (HH:MM or HH:MM:SS)
    #[arg(long, env = "BACKUP_RUN_AT", default_value = "00:00")]
    run_at: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single backup cycle immediately and exit
    Once,

    /// Show the resolved configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        mail: MailConfig {
            sender: cli.sender,
            password: cli.password,
            recipient: cli.recipient,
        },
        backup_dir: cli.backup_dir,
        scan_dir: cli.scan_dir,
        run_at: parse_run_at(&cli.run_at)?,
    };

    match cli.command {
        Some(Commands::Once) => {
            let notifier = Notifier::smtp(config.mail.clone())?;
            let outcome = run_cycle(&config, &notifier)?;
            println!(
                "Cycle complete: {} backed up, {} failed, notification {}.",
                outcome.successes.len(),
                outcome.failures.len(),
                if outcome.notified { "sent" } else { "not sent" }
            );
        }
        Some(Commands::Config) => {
            println!("dbbackup configuration");
            println!("======================");
            println!("Scan directory:   {}", config.scan_dir.display());
            println!("Backup directory: {}", config.backup_dir.display());
            println!("Daily run time:   {}", config.run_at.format("%H:%M:%S"));
            println!("Mail relay:       {}:465", RELAY_HOST);
            println!("Sender:           {}", config.mail.sender);
            println!("Recipient:        {}", config.mail.recipient);
            println!("Password:         ********");
        }
        None => run_daemon(config)?,
    }

    Ok(())
}

/// Run the scheduler loop until an external signal stops it
fn run_daemon(config: Config) -> Result<()> {
    println!("Daily database backup service started.");
    println!("Scanning:   {}", config.scan_dir.display());
    println!("Backups:    {}", config.backup_dir.display());
    println!("Run time:   {}", config.run_at.format("%H:%M:%S"));
    println!("Mail relay: {}:465", RELAY_HOST);

    let notifier = Notifier::smtp(config.mail.clone())?;

    let shutdown = Shutdown::new();
    let handler_shutdown = shutdown.clone();
    ctrlc::set_handler(move || {
        println!("Shutdown requested; stopping.");
        handler_shutdown.trigger();
    })?;

    let mut scheduler = Scheduler::new(config.run_at, SystemClock);
    scheduler.run(&shutdown, || run_cycle(&config, &notifier).map(|_| ()));

    println!("Backup service stopped.");
    Ok(())
}
