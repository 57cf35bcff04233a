use reqwest::{Client, StatusCode};

use super::DingTalkMessage;
use crate::{Error, Result};

/// Posts messages to DingTalk robot webhooks.
///
/// No request timeout is set, so a stalled webhook holds the inbound request
/// for as long as the underlying connection does.
#[derive(Debug, Clone, Default)]
pub struct DingTalkClient {
    client: Client,
}

impl DingTalkClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Sends one message. Anything other than exactly `200 OK` is a failure,
    /// including other 2xx codes.
    pub async fn send(&self, webhook_url: &str, message: &DingTalkMessage) -> Result<()> {
        let response = self.client.post(webhook_url).json(message).send().await?;

        // `response` is dropped on every path, which releases its connection.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Delivery {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
