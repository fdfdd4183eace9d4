use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Request type. Historical labels are what clients send and what gets stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RequestKind {
    #[serde(rename = "Ferie")]
    #[strum(to_string = "Ferie", serialize = "Vacation")]
    Vacation,
    #[serde(rename = "Permesso")]
    #[strum(to_string = "Permesso", serialize = "Permit")]
    Permit,
    #[serde(rename = "Mutua")]
    #[strum(to_string = "Mutua", serialize = "SickLeaveNotice")]
    SickLeaveNotice,
}

impl RequestKind {
    /// Sick-leave notices may reference any date.
    pub fn checks_blocked_dates(self) -> bool {
        self != RequestKind::SickLeaveNotice
    }

    pub fn requires_motivation(self) -> bool {
        self != RequestKind::SickLeaveNotice
    }
}

/// A validated request ready to be written. Optional text fields are `""` when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub kind: RequestKind,
    pub name: String,
    pub email: String,
    pub days: Vec<NaiveDate>,
    pub hours: String,
    pub start_time: String,
    pub end_time: String,
    pub motivation: String,
    pub note: String,
    pub status: String,
}

impl NewRequest {
    /// `days` as stored: a JSON list of `YYYY-MM-DD` strings in submission order.
    pub fn days_json(&self) -> String {
        serde_json::Value::from(
            self.days
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect::<Vec<_>>(),
        )
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[serde(rename = "type")]
    #[schema(example = "Permesso")]
    pub kind: RequestKind,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(value_type = Vec<String>, example = json!(["2025-01-10"]))]
    pub days: Vec<NaiveDate>,
    #[schema(example = "2h")]
    pub hours: String,
    #[schema(example = "")]
    pub start_time: String,
    #[schema(example = "")]
    pub end_time: String,
    #[schema(example = "visit")]
    pub motivation: String,
    pub note: String,
    pub status: String,
    #[schema(example = "2025-01-03T09:30:00Z", value_type = String, format = DateTime)]
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_parses_historical_and_english_labels() {
        assert_eq!(RequestKind::from_str("Ferie").unwrap(), RequestKind::Vacation);
        assert_eq!(RequestKind::from_str("permesso").unwrap(), RequestKind::Permit);
        assert_eq!(
            RequestKind::from_str("MUTUA").unwrap(),
            RequestKind::SickLeaveNotice
        );
        assert_eq!(
            RequestKind::from_str("SickLeaveNotice").unwrap(),
            RequestKind::SickLeaveNotice
        );
        assert!(RequestKind::from_str("Holiday").is_err());
    }

    #[test]
    fn kind_displays_historical_label() {
        assert_eq!(RequestKind::Permit.to_string(), "Permesso");
        assert_eq!(RequestKind::Vacation.as_ref(), "Ferie");
        assert_eq!(
            serde_json::to_value(RequestKind::SickLeaveNotice).unwrap(),
            "Mutua"
        );
    }

    #[test]
    fn days_json_keeps_submission_order() {
        let request = NewRequest {
            kind: RequestKind::Vacation,
            name: "Ana".into(),
            email: "a@x.com".into(),
            days: vec![
                NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ],
            hours: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            motivation: "trip".into(),
            note: String::new(),
            status: String::new(),
        };
        assert_eq!(request.days_json(), r#"["2025-01-12","2025-01-10"]"#);
    }
}
