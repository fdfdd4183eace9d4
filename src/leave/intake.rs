use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::dates::{self, parse_calendar_date};
use super::registry::BlockedDateRegistry;
use super::status::compute_status;
use crate::error::{AppError, ValidationError};
use crate::model::request::{NewRequest, RequestKind};
use crate::notify::{Notifier, RequestNotice};
use crate::store::Store;

/// Submission payload. Every field is optional at the wire level so that
/// missing values surface as a validation error rather than a parse error.
/// Italian keys from the historical form are accepted as aliases.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(rename = "type", alias = "tipo")]
    #[schema(example = "Permesso")]
    pub kind: Option<String>,
    #[serde(alias = "nome")]
    #[schema(example = "Ana")]
    pub name: Option<String>,
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[serde(alias = "giorni")]
    #[schema(example = json!(["2025-01-10"]))]
    pub days: Option<Vec<String>>,
    #[serde(alias = "ore")]
    #[schema(example = "2h")]
    pub hours: Option<String>,
    #[serde(alias = "oraInizio")]
    #[schema(example = "09:00")]
    pub start_time: Option<String>,
    #[serde(alias = "oraFine")]
    #[schema(example = "11:00")]
    pub end_time: Option<String>,
    #[serde(alias = "motivazione")]
    #[schema(example = "visit")]
    pub motivation: Option<String>,
    pub note: Option<String>,
}

/// Result of a submission that got as far as the store.
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Delivered { id: i64, status: String },
    /// The record is stored; only the notice failed. Nothing is rolled back.
    NotifyFailed { id: i64, status: String, reason: String },
}

impl SubmitOutcome {
    #[cfg(test)]
    pub fn id(&self) -> i64 {
        match self {
            SubmitOutcome::Delivered { id, .. } | SubmitOutcome::NotifyFailed { id, .. } => *id,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> &str {
        match self {
            SubmitOutcome::Delivered { status, .. }
            | SubmitOutcome::NotifyFailed { status, .. } => status,
        }
    }

    /// Collapses to what the caller is told: the status, or a delivery error.
    pub fn into_result(self) -> Result<String, AppError> {
        match self {
            SubmitOutcome::Delivered { status, .. } => Ok(status),
            SubmitOutcome::NotifyFailed { reason, .. } => Err(AppError::Delivery(reason)),
        }
    }
}

#[derive(Clone)]
pub struct RequestIntake {
    store: Arc<dyn Store>,
    registry: BlockedDateRegistry,
    notifier: Arc<dyn Notifier>,
}

impl RequestIntake {
    pub fn new(
        store: Arc<dyn Store>,
        registry: BlockedDateRegistry,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            registry,
            notifier,
        }
    }

    pub async fn submit(&self, payload: SubmitRequest) -> Result<SubmitOutcome, AppError> {
        self.submit_on(payload, dates::today()).await
    }

    /// Validate, check blocked dates, compute status, persist, notify. Each step
    /// waits for the previous one; anything failing before persistence leaves
    /// no record behind.
    #[instrument(name = "submit_request", skip_all)]
    pub async fn submit_on(
        &self,
        payload: SubmitRequest,
        today: NaiveDate,
    ) -> Result<SubmitOutcome, AppError> {
        let mut request = validate(payload)?;

        if request.kind.checks_blocked_dates() {
            let blocked = self.registry.blocked_set().await?;
            let conflicts = blocked_conflicts(&request.days, &blocked);
            if !conflicts.is_empty() {
                info!(kind = %request.kind, name = %request.name, "Request hits blocked dates");
                return Err(ValidationError::BlockedDateConflict(conflicts).into());
            }
        }

        request.status = compute_status(request.kind, request.days[0], today).to_string();

        let id = self.store.insert_request(&request).await?;
        info!(id, kind = %request.kind, name = %request.name, "Request stored");

        let notice = RequestNotice::for_request(&request);
        match self.notifier.dispatch(&notice).await {
            Ok(()) => Ok(SubmitOutcome::Delivered {
                id,
                status: request.status,
            }),
            Err(e) => {
                error!(id, error = %e, "Request stored but notification failed");
                Ok(SubmitOutcome::NotifyFailed {
                    id,
                    status: request.status,
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Structural checks. Runs before anything touches the store.
pub fn validate(payload: SubmitRequest) -> Result<NewRequest, ValidationError> {
    let kind = present(payload.kind).ok_or(ValidationError::MissingFields)?;
    let name = present(payload.name).ok_or(ValidationError::MissingFields)?;
    let email = present(payload.email).ok_or(ValidationError::MissingFields)?;
    let raw_days = payload
        .days
        .filter(|d| !d.is_empty())
        .ok_or(ValidationError::MissingFields)?;

    let kind = RequestKind::from_str(&kind).map_err(|_| ValidationError::UnknownType(kind))?;

    let motivation = present(payload.motivation);
    if kind.requires_motivation() && motivation.is_none() {
        return Err(ValidationError::MissingFields);
    }

    let hours = present(payload.hours);
    let start_time = present(payload.start_time);
    let end_time = present(payload.end_time);
    if kind == RequestKind::Permit
        && hours.is_none()
        && (start_time.is_none() || end_time.is_none())
    {
        return Err(ValidationError::MissingFields);
    }

    let days = raw_days
        .iter()
        .map(|d| parse_calendar_date(d))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewRequest {
        kind,
        name,
        email,
        days,
        hours: hours.unwrap_or_default(),
        start_time: start_time.unwrap_or_default(),
        end_time: end_time.unwrap_or_default(),
        motivation: motivation.unwrap_or_default(),
        note: present(payload.note).unwrap_or_default(),
        status: String::new(),
    })
}

/// Requested days that are blocked, as `dd/mm/yyyy, ...` in request order
/// without repeats. Empty when there is no conflict.
pub fn blocked_conflicts(days: &[NaiveDate], blocked: &HashSet<NaiveDate>) -> String {
    let mut seen = HashSet::new();
    days.iter()
        .filter(|d| blocked.contains(*d) && seen.insert(**d))
        .map(|d| dates::display(*d))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::status::{PENDING_SHORT_NOTICE, SICK_LEAVE_ACK, SUBMITTED};
    use crate::store::RequestFilter;
    use crate::testing::{FailingNotifier, RecordingNotifier, memory_store};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn permit(days: &[&str]) -> SubmitRequest {
        SubmitRequest {
            kind: Some("Permesso".into()),
            name: Some("Ana".into()),
            email: Some("a@x.com".into()),
            days: Some(days.iter().map(|d| d.to_string()).collect()),
            hours: Some("2h".into()),
            motivation: Some("visit".into()),
            ..Default::default()
        }
    }

    struct Fixture {
        store: Arc<dyn Store>,
        registry: BlockedDateRegistry,
        notifier: Arc<RecordingNotifier>,
        intake: RequestIntake,
    }

    async fn fixture() -> Fixture {
        let store = memory_store().await;
        let registry = BlockedDateRegistry::new(store.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let intake = RequestIntake::new(store.clone(), registry.clone(), notifier.clone());
        Fixture {
            store,
            registry,
            notifier,
            intake,
        }
    }

    async fn stored(store: &Arc<dyn Store>) -> usize {
        store.list_requests(&RequestFilter::default()).await.unwrap().len()
    }

    #[test]
    fn missing_fields_are_rejected() {
        let cases: Vec<Box<dyn Fn(&mut SubmitRequest)>> = vec![
            Box::new(|p| p.name = None),
            Box::new(|p| p.email = Some("  ".into())),
            Box::new(|p| p.days = None),
            Box::new(|p| p.days = Some(vec![])),
            Box::new(|p| p.kind = None),
            Box::new(|p| p.motivation = None),
            Box::new(|p| p.hours = None),
            Box::new(|p| {
                p.hours = None;
                p.start_time = Some("09:00".into());
            }),
        ];

        for mutate in cases {
            let mut payload = permit(&["2025-01-10"]);
            mutate(&mut payload);
            assert_eq!(validate(payload), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn permit_accepts_start_and_end_instead_of_hours() {
        let mut payload = permit(&["2025-01-10"]);
        payload.hours = None;
        payload.start_time = Some("09:00".into());
        payload.end_time = Some("11:00".into());

        let request = validate(payload).unwrap();
        assert_eq!(request.hours, "");
        assert_eq!(request.start_time, "09:00");
        assert_eq!(request.end_time, "11:00");
    }

    #[test]
    fn sick_leave_needs_no_motivation_and_vacation_no_hours() {
        let sick = SubmitRequest {
            kind: Some("Mutua".into()),
            motivation: None,
            hours: None,
            ..permit(&["2025-01-10"])
        };
        let request = validate(sick).unwrap();
        assert_eq!(request.kind, RequestKind::SickLeaveNotice);
        assert_eq!(request.motivation, "");

        let vacation = SubmitRequest {
            kind: Some("ferie".into()),
            hours: None,
            ..permit(&["2025-01-10"])
        };
        assert_eq!(validate(vacation).unwrap().kind, RequestKind::Vacation);
    }

    #[test]
    fn unknown_type_and_bad_dates_are_reported() {
        let payload = SubmitRequest {
            kind: Some("Sabbatical".into()),
            ..permit(&["2025-01-10"])
        };
        assert_eq!(
            validate(payload),
            Err(ValidationError::UnknownType("Sabbatical".into()))
        );

        assert_eq!(
            validate(permit(&["2025-01-10", "tomorrow"])),
            Err(ValidationError::InvalidDate("tomorrow".into()))
        );
    }

    #[test]
    fn conflicts_are_deduplicated_in_request_order() {
        let blocked = HashSet::from([day(2025, 1, 11), day(2025, 1, 10)]);
        let days = [day(2025, 1, 11), day(2025, 1, 9), day(2025, 1, 10), day(2025, 1, 11)];
        assert_eq!(blocked_conflicts(&days, &blocked), "11/01/2025, 10/01/2025");
        assert_eq!(blocked_conflicts(&[day(2025, 1, 9)], &blocked), "");
    }

    #[actix_web::test]
    async fn blocked_date_rejects_permit_but_not_sick_leave() {
        let f = fixture().await;
        f.registry.add(day(2025, 1, 10)).await.unwrap();
        let today = day(2025, 1, 1);

        let err = f
            .intake
            .submit_on(permit(&["2025-01-09", "2025-01-10"]), today)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::BlockedDateConflict(ref d)) if d == "10/01/2025"
        ));
        assert_eq!(stored(&f.store).await, 0);
        assert!(f.notifier.sent().is_empty());

        let sick = SubmitRequest {
            kind: Some("Mutua".into()),
            ..permit(&["2025-01-10"])
        };
        let outcome = f.intake.submit_on(sick, today).await.unwrap();
        assert_eq!(outcome.status(), SICK_LEAVE_ACK);
        assert_eq!(stored(&f.store).await, 1);
    }

    #[actix_web::test]
    async fn notice_period_drives_status_and_both_persist() {
        let f = fixture().await;

        let early = f
            .intake
            .submit_on(permit(&["2025-01-10"]), day(2025, 1, 3))
            .await
            .unwrap();
        assert_eq!(early.status(), SUBMITTED);

        let late = f
            .intake
            .submit_on(permit(&["2025-01-10"]), day(2025, 1, 9))
            .await
            .unwrap();
        assert_eq!(late.status(), PENDING_SHORT_NOTICE);

        let rows = f.store.list_requests(&RequestFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, late.id());
        assert_eq!(rows[0].status, PENDING_SHORT_NOTICE);
        assert_eq!(rows[1].status, SUBMITTED);

        let sent = f.notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].text.contains(PENDING_SHORT_NOTICE));
    }

    #[actix_web::test]
    async fn stored_days_keep_submission_order() {
        let f = fixture().await;
        let payload = SubmitRequest {
            kind: Some("Ferie".into()),
            hours: None,
            ..permit(&["2025-02-14", "2025-02-12T10:00:00Z", "2025-02-13"])
        };
        f.intake.submit_on(payload, day(2025, 1, 1)).await.unwrap();

        let rows = f.store.list_requests(&RequestFilter::default()).await.unwrap();
        assert_eq!(
            rows[0].days,
            vec![day(2025, 2, 14), day(2025, 2, 12), day(2025, 2, 13)]
        );
        assert_eq!(rows[0].hours, "");
        assert_eq!(rows[0].note, "");
    }

    #[actix_web::test]
    async fn failed_notice_keeps_the_record() {
        let store = memory_store().await;
        let registry = BlockedDateRegistry::new(store.clone());
        let intake = RequestIntake::new(store.clone(), registry, Arc::new(FailingNotifier));

        let outcome = intake
            .submit_on(permit(&["2025-01-10"]), day(2025, 1, 3))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::NotifyFailed { .. }));
        assert_eq!(stored(&store).await, 1);

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }

    #[actix_web::test]
    async fn invalid_payload_never_reaches_the_store() {
        let f = fixture().await;
        let mut payload = permit(&["2025-01-10"]);
        payload.motivation = None;

        let err = f.intake.submit_on(payload, day(2025, 1, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingFields)
        ));
        assert_eq!(stored(&f.store).await, 0);
        assert!(f.notifier.sent().is_empty());
    }
}
