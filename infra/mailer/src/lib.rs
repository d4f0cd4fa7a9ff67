//! # Mailer Infrastructure
//!
//! Best-effort SMTP notifications for coordinator alerts, built on
//! [lettre](https://lettre.rs).
//!
//! The mailer is deliberately forgiving: an incompletely configured transport
//! or a failed delivery is reported as a [`NotifyOutcome`] and logged, never
//! raised. Callers that must not fail on notification problems (the
//! registration handler) can rely on [`Mailer::notify`] being infallible.
//!
//! ## Example
//!
//! ```rust
//! use trailhub_mailer::{Mailer, MailerConfig};
//!
//! // No settings at all: notifications are skipped, nothing errors.
//! let mailer = Mailer::new(MailerConfig::default());
//! assert!(!mailer.is_configured());
//! ```

mod error;
mod message;

pub use error::MailerError;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::Deserialize;
use std::borrow::Cow;
use tracing::{info, instrument, warn};

/// Mail transport configuration. Every field is optional on its own; the
/// transport is considered configured only when all of them are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Fixed recipient of new-registration notifications.
    pub coordinator: Option<String>,
}

/// Fully resolved transport settings, available once the completeness gate passes.
#[derive(Debug, Clone)]
pub(crate) struct TransportSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub coordinator: String,
}

/// The explicit result of a notification attempt.
///
/// The dispatcher logs this and never propagates it; the HTTP response is
/// unaffected by whichever variant comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The message was accepted by the SMTP server.
    Sent,
    /// The transport configuration was incomplete; no session was opened.
    Skipped { reason: Cow<'static, str> },
    /// Message construction or delivery failed.
    Failed { reason: String },
}

impl NotifyOutcome {
    /// Whether the coordinator actually received (well, was sent) the message.
    #[must_use]
    pub const fn delivered(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// A registration summary to be mailed to the coordinator.
///
/// This mirrors the fields of a stored registration without depending on the
/// feature crate; the handler maps its model into this.
#[derive(Debug, Clone)]
pub struct RegistrationNotice {
    pub event_title: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub event_date: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vehicle: Option<String>,
    pub experience: Option<String>,
}

/// Coordinator notifier with a per-call, scoped SMTP session.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: MailerConfig,
}

impl Mailer {
    /// Creates a mailer from (possibly incomplete) transport configuration.
    #[must_use]
    pub const fn new(config: MailerConfig) -> Self {
        Self { config }
    }

    /// Whether all transport settings are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.resolve_settings().is_ok()
    }

    /// Sends the coordinator a notification about a freshly stored registration.
    ///
    /// The completeness gate runs before any transport session is opened: with
    /// any setting missing the attempt is skipped and logged. Construction and
    /// delivery failures are absorbed into [`NotifyOutcome::Failed`]; this
    /// method never returns an error and never panics.
    #[instrument(skip(self, notice), fields(event_title = %notice.event_title))]
    pub async fn notify(&self, notice: &RegistrationNotice) -> NotifyOutcome {
        let settings = match self.resolve_settings() {
            Ok(settings) => settings,
            Err(missing) => {
                warn!(%missing, "Mail transport not fully configured, skipping notification");
                return NotifyOutcome::Skipped {
                    reason: format!("missing transport settings: {missing}").into(),
                };
            }
        };

        match self.try_send(&settings, notice).await {
            Ok(()) => {
                info!(coordinator = %settings.coordinator, "Coordinator notification sent");
                NotifyOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "Coordinator notification failed");
                NotifyOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    /// Opens a scoped SMTP session: connect, STARTTLS upgrade, authenticate,
    /// send, close. The transport lives only for this call.
    async fn try_send(
        &self,
        settings: &TransportSettings,
        notice: &RegistrationNotice,
    ) -> Result<(), MailerError> {
        let message = message::build(settings, notice)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(settings.user.clone(), settings.password.clone()))
            .build();

        transport.send(message).await?;
        Ok(())
    }

    /// The completeness gate: returns resolved settings or the names of the
    /// missing ones.
    fn resolve_settings(&self) -> Result<TransportSettings, String> {
        let cfg = &self.config;
        let mut missing = Vec::new();

        if cfg.host.is_none() {
            missing.push("host");
        }
        if cfg.port.is_none() {
            missing.push("port");
        }
        if cfg.user.is_none() {
            missing.push("user");
        }
        if cfg.password.is_none() {
            missing.push("password");
        }
        if cfg.coordinator.is_none() {
            missing.push("coordinator");
        }

        if !missing.is_empty() {
            return Err(missing.join(", "));
        }

        Ok(TransportSettings {
            host: cfg.host.clone().unwrap_or_default(),
            port: cfg.port.unwrap_or_default(),
            user: cfg.user.clone().unwrap_or_default(),
            password: cfg.password.clone().unwrap_or_default(),
            coordinator: cfg.coordinator.clone().unwrap_or_default(),
        })
    }
}
