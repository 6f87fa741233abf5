use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every BSD device name starts with this prefix, followed by the drive number.
pub const BSD_PREFIX: &str = "disk";
/// Separates the drive number from a slice (partition) number, and nested
/// slices such as APFS volumes from each other: `disk3s1s1`.
pub const SLICE_SEPARATOR: char = 's';

/// A validated BSD-style device name such as `disk0` or `disk0s2`.
///
/// The grammar is `disk<digits>(s<digits>)*`. The drive number is the first
/// digit run, the partition number the second one. A digit run that does not
/// fit in a `u32` leaves that number absent rather than zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceIdentifier {
    raw: String,
    drive_number: Option<u32>,
    partition_number: Option<u32>,
}

impl DeviceIdentifier {
    /// Checks the name against the grammar without building anything.
    pub fn is_valid(raw: &str) -> bool {
        match raw.strip_prefix(BSD_PREFIX) {
            Some(rest) => rest
                .split(SLICE_SEPARATOR)
                .all(|run| !run.is_empty() && run.bytes().all(|b| b.is_ascii_digit())),
            None => false,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if !Self::is_valid(raw) {
            return Err(Error::InvalidIdentifier(raw.to_string()));
        }
        let mut runs = numeric_runs(raw).map(|run| run.parse::<u32>().ok());
        let drive_number = runs.next().flatten();
        let partition_number = runs.next().flatten();
        Ok(Self {
            raw: raw.to_string(),
            drive_number,
            partition_number,
        })
    }

    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    pub fn drive_number(&self) -> Option<u32> {
        self.drive_number
    }

    pub fn partition_number(&self) -> Option<u32> {
        self.partition_number
    }

    /// Number of numeric components in the name: 1 for `disk0`, 2 for
    /// `disk0s1`, 3 for an APFS snapshot like `disk3s1s1`. Overflowing runs
    /// still count.
    pub fn component_count(&self) -> usize {
        numeric_runs(&self.raw).count()
    }

    pub fn is_whole_disk(&self) -> bool {
        self.component_count() == 1
    }

    /// The whole-disk identifier this name belongs to (`disk0s2` -> `disk0`).
    pub fn parent_disk(&self) -> DeviceIdentifier {
        let drive = numeric_runs(&self.raw).next().unwrap_or_default();
        Self {
            raw: format!("{BSD_PREFIX}{drive}"),
            drive_number: self.drive_number,
            partition_number: None,
        }
    }
}

// Only meaningful on names that already passed `is_valid`.
fn numeric_runs(raw: &str) -> impl Iterator<Item = &str> {
    raw.strip_prefix(BSD_PREFIX)
        .unwrap_or_default()
        .split(SLICE_SEPARATOR)
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DeviceIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeviceIdentifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DeviceIdentifier> for String {
    fn from(value: DeviceIdentifier) -> Self {
        value.raw
    }
}
