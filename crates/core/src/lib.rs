mod bsd;
mod disk;
mod error;
mod order;

pub use bsd::{DeviceIdentifier, BSD_PREFIX, SLICE_SEPARATOR};
pub use disk::{DiskRecord, IdentityKey};
pub use error::{Error, Result};
pub use order::{compare_identifiers, order_key, order_records};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

pub const DISK_REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One enumeration pass, ready for serialization.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiskReport {
    pub report_id: Uuid,
    pub schema_version: String,
    pub host: HostInfo,
    pub serial_numbers: Vec<String>,
    pub disks: Vec<DiskRecord>,
    pub generated_at_utc: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String, // "macos", "linux", ...
    pub os_version: String,
    pub machine: String,
}

impl DiskReport {
    pub fn new(host: HostInfo, serial_numbers: Vec<String>, disks: Vec<DiskRecord>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            schema_version: DISK_REPORT_SCHEMA_VERSION.to_string(),
            host,
            serial_numbers,
            disks,
            generated_at_utc: now_utc_rfc3339(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

pub fn now_utc_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
