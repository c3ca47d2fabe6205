#![allow(missing_docs)] // proc macros dont play nicely with docstrings

//! # metrics
//!
//! statistics for the cluster connection
use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, TextEncoder, register_int_counter,
    register_int_counter_vec, register_int_gauge,
};
use prometheus_static_metric::make_static_metric;

make_static_metric! {
    pub label_enum ConnectOutcome {
        connected,
        failed,
    }
    pub struct ConnectStats: IntCounter {
        "outcome" => ConnectOutcome
    }
}

lazy_static! {
    /// When the process started
    pub static ref START_TIME: Instant = Instant::now();

    /// seconds since [`START_TIME`], refreshed on every encode
    pub static ref UPTIME: IntGauge = register_int_gauge!("grid_uptime", "process uptime in seconds").unwrap();

    pub static ref CONNECT_ATTEMPT_VEC: IntCounterVec = register_int_counter_vec!(
        "grid_connect_attempts",
        "cluster connection attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    /// count of connection attempts per outcome
    pub static ref CONNECT_ATTEMPTS: ConnectStats = ConnectStats::from(&CONNECT_ATTEMPT_VEC);

    /// discovery lookups that returned an error
    pub static ref DISCOVERY_FAILURES: IntCounter = register_int_counter!("grid_discovery_failures", "failed member discovery lookups").unwrap();

    /// number of members returned by the latest discovery lookup
    pub static ref DISCOVERED_MEMBERS: IntGauge = register_int_gauge!("grid_discovered_members", "members returned by the last discovery lookup").unwrap();
}

/// Every registered metric in the prometheus text exposition format
pub fn encode_text() -> prometheus::Result<String> {
    UPTIME.set(START_TIME.elapsed().as_secs() as i64);
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|err| prometheus::Error::Msg(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_stats() {
        let before = CONNECT_ATTEMPTS.failed.get();
        CONNECT_ATTEMPTS.failed.inc();
        assert!(CONNECT_ATTEMPTS.failed.get() > before);
        DISCOVERED_MEMBERS.set(3);
        assert!(START_TIME.elapsed().as_secs() < 60 * 60);
    }

    #[test]
    fn test_encode_text() {
        CONNECT_ATTEMPTS.connected.inc();
        DISCOVERY_FAILURES.inc();
        DISCOVERED_MEMBERS.set(2);
        let text = encode_text().unwrap();
        assert!(text.contains("grid_connect_attempts{outcome=\"connected\"}"));
        assert!(text.contains("grid_discovery_failures"));
        assert!(text.contains("grid_discovered_members"));
        assert!(text.contains("grid_uptime"));
    }
}
