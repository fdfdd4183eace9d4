use chrono::NaiveDate;

use super::dates::lead_days;
use crate::model::request::RequestKind;

pub const SICK_LEAVE_ACK: &str = "Thank you for sending us the notice.";
pub const PENDING_SHORT_NOTICE: &str =
    "Request pending approval because it was not submitted at least 5 days in advance.";
pub const SUBMITTED: &str =
    "Your request was submitted successfully. You will be notified of the outcome shortly.";

/// Minimum notice, in calendar days, for a request to skip the pending state.
pub const MIN_LEAD_DAYS: i64 = 5;

/// Status assigned at creation. Sick-leave notices are acknowledged whatever
/// their dates; everything else depends only on the notice given.
pub fn compute_status(kind: RequestKind, first_day: NaiveDate, today: NaiveDate) -> &'static str {
    if kind == RequestKind::SickLeaveNotice {
        return SICK_LEAVE_ACK;
    }

    if lead_days(first_day, today) < MIN_LEAD_DAYS {
        PENDING_SHORT_NOTICE
    } else {
        SUBMITTED
    }
}
