//! Registrations feature slice.
//!
//! The single place where request dispatch, persistence, and the
//! notification side effect are orchestrated: sign-ups arrive over HTTP,
//! are committed to the `registrations` table, and the coordinator is
//! notified on a best-effort basis.

mod error;
mod handlers;
mod model;
mod repository;

pub use error::RegistrationsError;
pub use handlers::{RegistrationsApiDoc, router};
pub use model::{CreatedRegistration, ListParams, NewRegistration, Registration};
pub use repository::{create, list};

/// Idempotent DDL for the registrations table, applied by the database
/// layer at startup. `id` and `created_at` are store-assigned; `status`
/// starts out `pending` and is only ever changed outside this slice.
pub const SCHEMA: &str = "
DEFINE TABLE IF NOT EXISTS registrations SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS event_title ON registrations TYPE string;
DEFINE FIELD IF NOT EXISTS event_date ON registrations TYPE string;
DEFINE FIELD IF NOT EXISTS name ON registrations TYPE string;
DEFINE FIELD IF NOT EXISTS phone ON registrations TYPE string;
DEFINE FIELD IF NOT EXISTS email ON registrations TYPE string;
DEFINE FIELD IF NOT EXISTS vehicle ON registrations TYPE option<string>;
DEFINE FIELD IF NOT EXISTS experience ON registrations TYPE option<string>;
DEFINE FIELD IF NOT EXISTS status ON registrations TYPE string DEFAULT 'pending';
DEFINE FIELD IF NOT EXISTS created_at ON registrations TYPE datetime DEFAULT time::now() READONLY;
";
