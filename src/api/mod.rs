pub mod admin;
pub mod blocked_dates;
pub mod requests;
