//! Named user-action events.
//!
//! Fire-and-forget wrappers over [`Monitoring::track_event`]; failures are
//! logged and dropped.

use serde_json::{json, Value};

use super::{Monitoring, Properties};

pub const DEFAULT_AUTH_METHOD: &str = "email";

fn track(monitoring: &impl Monitoring, name: &str, properties: Value) {
    let properties = match properties {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            let mut map = Properties::new();
            map.insert("value".to_string(), other);
            Some(map)
        }
    };
    if let Err(e) = monitoring.track_event(name, properties) {
        tracing::warn!(error = %e, event = %name, "Failed to track action");
    }
}

pub fn signup(monitoring: &impl Monitoring, method: Option<&str>) {
    let method = method.unwrap_or(DEFAULT_AUTH_METHOD);
    track(monitoring, "user_signed_up", json!({ "method": method }));
}

pub fn login(monitoring: &impl Monitoring, method: Option<&str>) {
    let method = method.unwrap_or(DEFAULT_AUTH_METHOD);
    track(monitoring, "user_logged_in", json!({ "method": method }));
}

pub fn reservation_created(monitoring: &impl Monitoring, amount: f64, capacity: f64) {
    track(
        monitoring,
        "reservation_created",
        json!({ "amount": amount, "capacity": capacity }),
    );
}

pub fn payment_completed(monitoring: &impl Monitoring, amount: f64, kind: &str) {
    track(
        monitoring,
        "payment_completed",
        json!({ "amount": amount, "type": kind }),
    );
}

pub fn bill_paid(monitoring: &impl Monitoring, amount: f64, credits_applied: f64) {
    track(
        monitoring,
        "bill_paid",
        json!({ "amount": amount, "creditsApplied": credits_applied }),
    );
}

pub fn credit_earned(monitoring: &impl Monitoring, amount: f64) {
    track(monitoring, "credit_earned", json!({ "amount": amount }));
}

pub fn kyc_completed(monitoring: &impl Monitoring) {
    track(monitoring, "kyc_completed", Value::Null);
}

pub fn onboarding_completed(monitoring: &impl Monitoring) {
    track(monitoring, "onboarding_completed", Value::Null);
}
