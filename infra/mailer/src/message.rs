use crate::error::MailerError;
use crate::{RegistrationNotice, TransportSettings};
use chrono::NaiveDate;
use lettre::Message;
use lettre::message::MultiPart;
use std::fmt::Write;

/// Builds the dual-format coordinator notification for a new registration.
///
/// The plain-text part is the fallback for clients that do not render HTML.
pub(crate) fn build(
    settings: &TransportSettings,
    notice: &RegistrationNotice,
) -> Result<Message, MailerError> {
    let event_date = format_event_date(&notice.event_date)?;

    let text = text_body(notice, &event_date);
    let html = html_body(notice, &event_date);

    let message = Message::builder()
        .from(settings.user.parse()?)
        .to(settings.coordinator.parse()?)
        .subject(format!("New trip registration: {}", notice.event_title))
        .multipart(MultiPart::alternative_plain_html(text, html))?;

    Ok(message)
}

/// Reformats the ISO-8601 calendar date (`2024-01-15`) as `15.01.2024`.
fn format_event_date(raw: &str) -> Result<String, MailerError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| MailerError::Format {
        message: format!("Unparseable event date {raw:?}: {e}").into(),
    })?;
    Ok(date.format("%d.%m.%Y").to_string())
}

fn text_body(notice: &RegistrationNotice, event_date: &str) -> String {
    let mut body = format!(
        "NEW TRIP REGISTRATION\n\n\
         Route: {}\n\
         Date: {}\n\n\
         Participant: {}\n\
         Phone: {}\n\
         Email: {}\n",
        notice.event_title, event_date, notice.name, notice.phone, notice.email,
    );

    if let Some(vehicle) = &notice.vehicle {
        let _ = writeln!(body, "Vehicle: {vehicle}");
    }
    if let Some(experience) = &notice.experience {
        let _ = writeln!(body, "Experience: {experience}");
    }

    body
}

fn html_body(notice: &RegistrationNotice, event_date: &str) -> String {
    let mut rows = String::new();
    push_row(&mut rows, "Route", &notice.event_title);
    push_row(&mut rows, "Trip date", event_date);
    push_row(&mut rows, "Participant", &notice.name);
    push_row(
        &mut rows,
        "Phone",
        &format!("<a href=\"tel:{0}\">{0}</a>", notice.phone),
    );
    push_row(
        &mut rows,
        "Email",
        &format!("<a href=\"mailto:{0}\">{0}</a>", notice.email),
    );
    if let Some(vehicle) = &notice.vehicle {
        push_row(&mut rows, "Vehicle", vehicle);
    }
    if let Some(experience) = &notice.experience {
        push_row(&mut rows, "Off-road experience", experience);
    }

    format!(
        r#"<html>
<head>
<style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
               color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
    .content {{ background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }}
    .info-row {{ margin: 15px 0; padding: 15px; background: white; border-radius: 5px; }}
    .label {{ font-weight: bold; color: #667eea; }}
    .value {{ margin-top: 5px; }}
    .footer {{ text-align: center; margin-top: 30px; color: #999; font-size: 12px; }}
</style>
</head>
<body>
    <div class="container">
        <div class="header"><h1>NEW TRIP REGISTRATION</h1></div>
        <div class="content">
{rows}
            <div class="footer">
                <p>Automated notification from the TrailHub registration system</p>
            </div>
        </div>
    </div>
</body>
</html>"#
    )
}

fn push_row(rows: &mut String, label: &str, value: &str) {
    let _ = write!(
        rows,
        "            <div class=\"info-row\">\n                <div class=\"label\">{label}:</div>\n                <div class=\"value\">{value}</div>\n            </div>\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TransportSettings {
        TransportSettings {
            host: "smtp.example.com".to_owned(),
            port: 587,
            user: "robot@example.com".to_owned(),
            password: "secret".to_owned(),
            coordinator: "coordinator@example.com".to_owned(),
        }
    }

    fn notice() -> RegistrationNotice {
        RegistrationNotice {
            event_title: "Winter Trail".to_owned(),
            event_date: "2024-01-15".to_owned(),
            name: "A. Ivanov".to_owned(),
            phone: "+79001234567".to_owned(),
            email: "a@x.com".to_owned(),
            vehicle: Some("UAZ Patriot".to_owned()),
            experience: None,
        }
    }

    #[test]
    fn builds_multipart_alternative() {
        let message = build(&settings(), &notice()).expect("message builds");
        let rendered = String::from_utf8(message.formatted()).expect("utf8 message");

        assert!(rendered.contains("multipart/alternative"));
        assert!(rendered.contains("New trip registration: Winter Trail"));
    }

    #[test]
    fn event_date_is_reformatted() {
        assert_eq!(format_event_date("2024-01-15").unwrap(), "15.01.2024");
    }

    #[test]
    fn malformed_date_is_a_format_error() {
        let err = format_event_date("yesterday").unwrap_err();
        assert!(matches!(err, MailerError::Format { .. }));
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let mut n = notice();
        n.vehicle = None;
        let html = html_body(&n, "15.01.2024");
        assert!(!html.contains("Vehicle"));
        assert!(!html.contains("Off-road experience"));

        let text = text_body(&n, "15.01.2024");
        assert!(!text.contains("Vehicle:"));
    }

    #[test]
    fn links_are_clickable_in_html() {
        let html = html_body(&notice(), "15.01.2024");
        assert!(html.contains("href=\"tel:+79001234567\""));
        assert!(html.contains("href=\"mailto:a@x.com\""));
    }
}
