use crate::error::RegistrationsError;
use crate::model::{CreatedRegistration, ListParams, NewRegistration, NewRegistrationRow, Registration};
use tracing::{debug, instrument};
use trailhub_database::{Database, DatabaseErrorExt};

/// Insert-and-return in one round trip. The table defaults assign `status`
/// and `created_at`; the returned key and timestamp go into the response
/// verbatim.
const CREATE_QUERY: &str = "\
LET $created = CREATE ONLY registrations CONTENT $data;
RETURN { id: $created.id.id(), created_at: <string> $created.created_at };";

/// The inner select orders on the raw datetime before the projection casts
/// it; ordering on the cast alias would compare serialized strings, which
/// misorders whole-second timestamps against fractional ones.
const LIST_QUERY: &str = "\
SELECT id.id() AS id, event_title, event_date, name, phone, email, \
vehicle, experience, status, <string> created_at AS created_at \
FROM (SELECT * FROM registrations ORDER BY created_at DESC)";

const LIST_BY_STATUS_QUERY: &str = "\
SELECT id.id() AS id, event_title, event_date, name, phone, email, \
vehicle, experience, status, <string> created_at AS created_at \
FROM (SELECT * FROM registrations WHERE status = $status ORDER BY created_at DESC)";

/// Commits one new registration and returns its store-assigned identity.
///
/// # Errors
/// Returns [`RegistrationsError::Store`] if the insert fails; nothing is
/// persisted in that case (single atomic statement).
#[instrument(skip(db, registration), fields(event_title = %registration.event_title))]
pub async fn create(
    db: &Database,
    registration: &NewRegistration,
) -> Result<CreatedRegistration, RegistrationsError> {
    let row = NewRegistrationRow::from(registration);

    let created = db
        .query(CREATE_QUERY)
        .bind(("data", row))
        .await
        .context("Creating registration")?
        .take::<Option<CreatedRegistration>>(1)
        .context("Parsing created registration")?
        .ok_or(RegistrationsError::Internal {
            message: "Store returned no row for a committed registration".into(),
            context: None,
        })?;

    debug!(id = %created.id, "Registration committed");
    Ok(created)
}

/// Lists registrations, most recent first, optionally restricted to a status.
///
/// The filter is an exact, case-sensitive equality bound as a parameter; the
/// two query variants are compile-time constants.
///
/// # Errors
/// Returns [`RegistrationsError::Store`] if the select fails.
#[instrument(skip(db, params), fields(status = params.status.as_deref()))]
pub async fn list(
    db: &Database,
    params: &ListParams,
) -> Result<Vec<Registration>, RegistrationsError> {
    let mut response = match &params.status {
        Some(status) => db
            .query(LIST_BY_STATUS_QUERY)
            .bind(("status", status.clone()))
            .await
            .context("Listing registrations by status")?,
        None => db.query(LIST_QUERY).await.context("Listing registrations")?,
    };

    let registrations =
        response.take::<Vec<Registration>>(0).context("Parsing registration list")?;

    debug!(count = registrations.len(), "Registrations listed");
    Ok(registrations)
}
