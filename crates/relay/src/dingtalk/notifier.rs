use tracing::{debug, info, warn};

use super::{DingTalkClient, DingTalkMessage};
use crate::{alerts::AlertBatch, config::DingTalkConfig, metrics, Result};

pub struct DingTalkNotifier {
    config: DingTalkConfig,
    client: DingTalkClient,
}

impl DingTalkNotifier {
    pub fn new(config: DingTalkConfig, client: DingTalkClient) -> Self {
        Self { config, client }
    }

    /// Delivers one message per alert, in batch order, to the robot
    /// identified by `key`. Stops at the first failure; messages already sent
    /// stay sent. Returns the number of messages delivered.
    pub async fn relay(&self, key: &str, batch: &AlertBatch) -> Result<usize> {
        let webhook_url = self.config.webhook_url(key)?;

        info!(
            "Relaying {} alerts to DingTalk robot {}",
            batch.alerts.len(),
            key
        );

        for (index, alert) in batch.alerts.iter().enumerate() {
            let message = DingTalkMessage::for_alert(alert, &self.config);

            if let Err(e) = self.client.send(&webhook_url, &message).await {
                warn!(
                    "Delivery of alert {}/{} to robot {} failed: {}",
                    index + 1,
                    batch.alerts.len(),
                    key,
                    e
                );
                metrics::record_failure(&e);
                return Err(e);
            }

            metrics::MESSAGES_DELIVERED_TOTAL.inc();
            debug!("Delivered alert {}/{} to robot {}", index + 1, batch.alerts.len(), key);
        }

        Ok(batch.alerts.len())
    }
}
