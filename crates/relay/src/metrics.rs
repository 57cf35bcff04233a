use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Registry, TextEncoder,
};

use crate::{Error, Result};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ALERTS_RECEIVED_TOTAL: IntCounter = register_int_counter_with_registry!(
        "dingtalk_relay_alerts_received_total",
        "Total number of alerts decoded from inbound webhooks.",
        REGISTRY
    )
    .expect("Failed to register ALERTS_RECEIVED_TOTAL");
    pub static ref MESSAGES_DELIVERED_TOTAL: IntCounter = register_int_counter_with_registry!(
        "dingtalk_relay_messages_delivered_total",
        "Total number of messages accepted by DingTalk.",
        REGISTRY
    )
    .expect("Failed to register MESSAGES_DELIVERED_TOTAL");
    pub static ref DELIVERY_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec_with_registry!(
        "dingtalk_relay_delivery_failures_total",
        "Total number of failed DingTalk deliveries, by reason.",
        &["reason"],
        REGISTRY
    )
    .expect("Failed to register DELIVERY_FAILURES_TOTAL");
}

pub fn record_failure(err: &Error) {
    let reason = match err {
        Error::Transport(_) => "transport",
        Error::Delivery { .. } => "status",
        _ => return,
    };
    DELIVERY_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

// Function to gather metrics for exposition
pub fn gather_metrics() -> Result<String> {
    // Touch the lazies so every series shows up before the first alert.
    lazy_static::initialize(&ALERTS_RECEIVED_TOTAL);
    lazy_static::initialize(&MESSAGES_DELIVERED_TOTAL);
    lazy_static::initialize(&DELIVERY_FAILURES_TOTAL);

    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Internal(e.to_string()))
}
