use async_trait::async_trait;
use derive_more::Display;

use crate::model::request::NewRequest;

pub mod relay;

#[derive(Debug, Display)]
pub enum NotifyError {
    #[display(fmt = "relay unreachable: {}", _0)]
    Transport(String),
    #[display(fmt = "relay rejected message with status {}", _0)]
    Rejected(u16),
}

impl std::error::Error for NotifyError {}

/// Message sent to the operational mailbox when a request is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestNotice {
    pub subject: String,
    pub text: String,
}

impl RequestNotice {
    pub fn for_request(request: &NewRequest) -> Self {
        let days = request
            .days
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(" - ");

        let hours = if !request.hours.is_empty() {
            request.hours.clone()
        } else if !request.start_time.is_empty() && !request.end_time.is_empty() {
            format!("{}-{}", request.start_time, request.end_time)
        } else {
            "N/A".to_string()
        };

        let text = format!(
            "New request received:\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Request type: {kind}\n\
             Days: {days}\n\
             Hours: {hours}\n\
             Motivation: {motivation}\n\
             Note: {note}\n\
             Status: {status}\n",
            name = request.name,
            email = request.email,
            kind = request.kind,
            motivation = or_default(&request.motivation, "N/A"),
            note = or_default(&request.note, "None"),
            status = request.status,
        );

        Self {
            subject: format!("New {} request from {}", request.kind, request.name),
            text,
        }
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Outbound delivery of [`RequestNotice`]s. No retries at this layer.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notice: &RequestNotice) -> Result<(), NotifyError>;
}
