use crate::bsd::DeviceIdentifier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stand-in identity for records without a registry UUID.
///
/// Generated once when the record is built and never recomputed. Two passes
/// over the same registry produce different keys, so it is only good for
/// telling records of one pass apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(Uuid);

impl IdentityKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// A disk or partition as seen in one registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskRecord {
    pub identifier: DeviceIdentifier,
    pub ejectable: bool,
    /// Hot-swappable.
    pub removable: bool,
    /// Whole disk rather than a partition.
    pub whole: bool,
    pub writable: bool,
    pub open: bool,
    /// No storage subdevices below this one.
    pub leaf: bool,
    /// Partition scheme or filesystem label, e.g. `GUID_partition_scheme`.
    pub content: Option<String>,
    pub size: u64,
    /// `None` means unknown, which is not the same as `Some(false)`.
    pub encrypted: Option<bool>,
    pub encryption_type: Option<String>,
    pub name: Option<String>,
    pub uuid: Option<Uuid>,
    pub identity_key: IdentityKey,
}

impl DiskRecord {
    /// The registry UUID when there is one, the per-pass identity key otherwise.
    pub fn id(&self) -> Uuid {
        self.uuid.unwrap_or_else(|| self.identity_key.as_uuid())
    }

    pub fn active_encryption_type(&self) -> Option<&str> {
        match self.encrypted {
            Some(true) => self.encryption_type.as_deref(),
            _ => None,
        }
    }
}
