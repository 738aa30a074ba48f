//! Email notification delivery
//!
//! Sends the cycle summary to the configured recipient over an authenticated,
//! implicitly-TLS SMTP connection. Delivery failures are logged and collapsed
//! into a boolean so they can never take down a cycle.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::error::{BackupError, BackupResult};

/// Fixed mail relay endpoint (implicit TLS, port 465)
pub const RELAY_HOST: &str = "smtp.gmail.com";

/// Seam between message composition and the wire
///
/// The production implementation is [`SmtpMailer`]; tests substitute an
/// in-memory transport.
pub trait MailTransport {
    /// Deliver one message
    fn send(&self, message: &Message) -> BackupResult<()>;
}

/// SMTP delivery through the fixed relay
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build a mailer for the fixed relay
    ///
    /// The underlying connection is opened per send and closed when the send
    /// completes; nothing is held open across cycles.
    pub fn new(config: &MailConfig) -> BackupResult<Self> {
        let credentials = Credentials::new(config.sender.clone(), config.password.clone());
        let transport = SmtpTransport::relay(RELAY_HOST)
            .map_err(|e| BackupError::Network(format!("Failed to configure mail relay: {}", e)))?
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &Message) -> BackupResult<()> {
        self.transport
            .send(message)
            .map_err(classify_smtp_error)?;
        Ok(())
    }
}

/// Map a lettre SMTP error onto the crate taxonomy
///
/// A permanent rejection from the relay on this single-command exchange is
/// a credential problem in practice; everything else (connection, TLS,
/// timeouts, transient rejections) counts as a network fault.
fn classify_smtp_error(error: lettre::transport::smtp::Error) -> BackupError {
    if error.is_permanent() {
        BackupError::Auth(error.to_string())
    } else {
        BackupError::Network(error.to_string())
    }
}

/// Composes and delivers cycle notifications
pub struct Notifier<T: MailTransport> {
    config: MailConfig,
    transport: T,
}

impl Notifier<SmtpMailer> {
    /// Create a Notifier backed by the real SMTP relay
    pub fn smtp(config: MailConfig) -> BackupResult<Self> {
        let transport = SmtpMailer::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: MailTransport> Notifier<T> {
    /// Create a Notifier over an arbitrary transport
    pub fn new(config: MailConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Send a plain-text notification
    ///
    /// Returns whether transmission completed without error. Every failure
    /// (bad addresses, auth rejection, network trouble) is logged here and
    /// converted into `false`; nothing propagates to the caller.
    pub fn notify(&self, subject: &str, body: &str) -> bool {
        match self.try_send(subject, body) {
            Ok(()) => {
                println!("Notification email sent.");
                true
            }
            Err(e) => {
                eprintln!("Failed to send notification email: {}", e);
                false
            }
        }
    }

    fn try_send(&self, subject: &str, body: &str) -> BackupResult<()> {
        let from: Mailbox = self.config.sender.parse().map_err(|e| {
            BackupError::Config(format!(
                "Invalid sender address {:?}: {}",
                self.config.sender, e
            ))
        })?;
        let to: Mailbox = self.config.recipient.parse().map_err(|e| {
            BackupError::Config(format!(
                "Invalid recipient address {:?}: {}",
                self.config.recipient, e
            ))
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| BackupError::Unexpected(format!("Failed to build message: {}", e)))?;

        self.transport.send(&message)
    }
}
