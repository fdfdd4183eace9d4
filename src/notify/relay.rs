use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{Notifier, NotifyError, RequestNotice};
use crate::config::RelayConfig;

/// Hands notices to an HTTP mail relay as JSON, authenticated with basic credentials.
#[derive(Clone)]
pub struct RelayNotifier {
    client: reqwest::Client,
    url: String,
    username: String,
    password: String,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl RelayNotifier {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    #[instrument(name = "relay_dispatch", skip_all, fields(subject = %notice.subject))]
    async fn dispatch(&self, notice: &RequestNotice) -> Result<(), NotifyError> {
        let message = RelayMessage {
            from: &self.from,
            to: &self.to,
            subject: &notice.subject,
            text: &notice.text,
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&message)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        debug!("Notice handed to relay");
        Ok(())
    }
}
