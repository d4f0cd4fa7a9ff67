use std::borrow::Cow;

/// A specialized [`MailerError`] enum of this crate.
///
/// These errors never cross the [`crate::Mailer::notify`] boundary; they are
/// absorbed into a [`crate::NotifyOutcome`] at the call site.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Malformed sender or recipient address.
    #[error("Mail address error: {source}")]
    Address {
        #[from]
        source: lettre::address::AddressError,
    },

    /// Message assembly failures.
    #[error("Mail message error: {source}")]
    Message {
        #[from]
        source: lettre::error::Error,
    },

    /// SMTP transport failures (connect, STARTTLS, auth, send).
    #[error("SMTP transport error: {source}")]
    Transport {
        #[from]
        source: lettre::transport::smtp::Error,
    },

    /// Formatting failures on notification fields (e.g., unparseable event date).
    #[error("Mail format error: {message}")]
    Format { message: Cow<'static, str> },
}
