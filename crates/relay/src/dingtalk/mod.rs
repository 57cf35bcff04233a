//! DingTalk robot messages
//!
//! Every alert becomes one `actionCard` message posted to a robot webhook.

mod client;
mod notifier;

pub use client::DingTalkClient;
pub use notifier::DingTalkNotifier;

use serde::{Deserialize, Serialize};

use crate::{alerts::Alert, config::DingTalkConfig};

pub const MSG_TYPE_ACTION_CARD: &str = "actionCard";
pub const CARD_TITLE: &str = "🚨 New Alert";
pub const SILENCE_BUTTON_TITLE: &str = "Silence Alert";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DingTalkMessage {
    #[serde(rename = "msgType")]
    pub msg_type: String,
    #[serde(rename = "actionCard")]
    pub action_card: ActionCard,
    pub at: At,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionCard {
    pub title: String,
    pub text: String,
    #[serde(rename = "btnOrientation")]
    pub btn_orientation: BtnOrientation,
    pub btns: Vec<Button>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BtnOrientation {
    #[serde(rename = "0")]
    Horizontal,
    #[serde(rename = "1")]
    Vertical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct At {
    #[serde(rename = "atMobiles")]
    pub at_mobiles: Vec<String>,
    #[serde(rename = "isAtAll")]
    pub is_at_all: bool,
}

impl DingTalkMessage {
    pub fn for_alert(alert: &Alert, config: &DingTalkConfig) -> Self {
        Self {
            msg_type: MSG_TYPE_ACTION_CARD.to_string(),
            action_card: ActionCard {
                title: CARD_TITLE.to_string(),
                text: format_markdown(alert),
                btn_orientation: BtnOrientation::Horizontal,
                btns: vec![Button {
                    title: SILENCE_BUTTON_TITLE.to_string(),
                    action_url: config.silence_url.clone(),
                }],
            },
            at: At {
                at_mobiles: config.at_mobiles.clone(),
                is_at_all: alert.label("severity") == "critical",
            },
        }
    }
}

pub fn format_markdown(alert: &Alert) -> String {
    format!(
        "### 🚨 **Alert: {}**\n\n\
         **Status:** {}\n\n\
         **Severity:** {}\n\n\
         **Description:** {}\n\n\
         **Starts At:** {}\n\n\
         **Ends At:** {}\n\n",
        alert.annotation("summary"),
        alert.status,
        alert.label("severity"),
        alert.annotation("description"),
        alert.starts_at,
        alert.ends_at,
    )
}
