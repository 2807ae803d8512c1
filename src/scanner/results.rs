use std::net::Ipv4Addr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// One host that answered with a parseable identification banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub address: Ipv4Addr,
    pub protocol_version: String,
    #[serde(serialize_with = "serialize_base64")]
    pub kex_method_blob: Vec<u8>,
}

/// Tally of how every attempted address ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub attempted: u64,
    pub responded: u64,
    pub timeouts: u64,
    pub no_data: u64,
    pub connection_errors: u64,
    pub malformed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub port: u16,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub summary: ScanSummary,
    pub results: Vec<ScanResult>,
}

impl ScanReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
