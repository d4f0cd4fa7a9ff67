use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb_types::SurrealValue;
use trailhub_mailer::RegistrationNotice;
use utoipa::{IntoParams, ToSchema};

/// A new sign-up submission.
///
/// The five required fields are non-optional here, so a payload missing any
/// of them is rejected during extraction and nothing reaches the store.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewRegistration {
    pub event_title: String,
    /// Calendar date of the trip (`YYYY-MM-DD`).
    pub event_date: NaiveDate,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vehicle: Option<String>,
    pub experience: Option<String>,
}

impl NewRegistration {
    /// The coordinator notification summary for this submission.
    #[must_use]
    pub fn to_notice(&self) -> RegistrationNotice {
        RegistrationNotice {
            event_title: self.event_title.clone(),
            event_date: self.event_date.to_string(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            vehicle: self.vehicle.clone(),
            experience: self.experience.clone(),
        }
    }
}

/// Row shape bound into the `CREATE` statement. `status` and `created_at`
/// are filled by the table defaults, never by the handler.
#[derive(Debug, SurrealValue)]
pub(crate) struct NewRegistrationRow {
    pub event_title: String,
    pub event_date: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vehicle: Option<String>,
    pub experience: Option<String>,
}

impl From<&NewRegistration> for NewRegistrationRow {
    fn from(new: &NewRegistration) -> Self {
        Self {
            event_title: new.event_title.clone(),
            event_date: new.event_date.to_string(),
            name: new.name.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            vehicle: new.vehicle.clone(),
            experience: new.experience.clone(),
        }
    }
}

/// What the store hands back for a committed sign-up.
#[derive(Debug, Clone, Serialize, SurrealValue, ToSchema)]
pub struct CreatedRegistration {
    /// Store-assigned record key.
    pub id: String,
    /// Store-assigned creation timestamp, ISO-8601.
    pub created_at: String,
}

/// A stored registration as returned by the listing endpoint.
///
/// Null dates and timestamps serialize as JSON `null`, never as an empty
/// string or an omitted key.
#[derive(Debug, Clone, Serialize, SurrealValue, ToSchema)]
pub struct Registration {
    pub id: String,
    pub event_title: String,
    pub event_date: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vehicle: Option<String>,
    pub experience: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
}

/// Listing filter. `status` matches exactly and case-sensitively.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListParams {
    pub status: Option<String>,
}

/// Listing response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationList {
    pub registrations: Vec<Registration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_enforced_by_deserialization() {
        let missing_phone = serde_json::json!({
            "event_title": "Winter Trail",
            "event_date": "2024-01-15",
            "name": "A. Ivanov",
            "email": "a@x.com"
        });
        assert!(serde_json::from_value::<NewRegistration>(missing_phone).is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let payload = serde_json::json!({
            "event_title": "Winter Trail",
            "event_date": "2024-01-15",
            "name": "A. Ivanov",
            "phone": "+79001234567",
            "email": "a@x.com"
        });
        let new: NewRegistration = serde_json::from_value(payload).expect("valid payload");
        assert!(new.vehicle.is_none());
        assert!(new.experience.is_none());
        assert_eq!(new.event_date.to_string(), "2024-01-15");
    }

    #[test]
    fn notice_carries_iso_date() {
        let new = NewRegistration {
            event_title: "Winter Trail".to_owned(),
            event_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            name: "A. Ivanov".to_owned(),
            phone: "+79001234567".to_owned(),
            email: "a@x.com".to_owned(),
            vehicle: None,
            experience: None,
        };
        let notice = new.to_notice();
        assert_eq!(notice.event_date, "2024-01-15");
    }

    #[test]
    fn null_optionals_serialize_as_null() {
        let record = Registration {
            id: "abc".to_owned(),
            event_title: "Winter Trail".to_owned(),
            event_date: None,
            name: "A. Ivanov".to_owned(),
            phone: "+79001234567".to_owned(),
            email: "a@x.com".to_owned(),
            vehicle: None,
            experience: None,
            status: "pending".to_owned(),
            created_at: None,
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert!(value.get("event_date").expect("key present").is_null());
        assert!(value.get("created_at").expect("key present").is_null());
    }
}
