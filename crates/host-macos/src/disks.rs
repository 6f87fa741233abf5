use crate::keys;
use devtree_core::{order_records, DeviceIdentifier, DiskRecord, IdentityKey};
use devtree_registry::{RegistryCursor, RegistryEntry};
use tracing::info;
use uuid::Uuid;

/// Turns one registry entry into a disk record, or `None` when the entry is
/// not a usable disk: no valid BSD name, or any mandatory property missing.
pub fn build_disk_record(entry: &RegistryEntry) -> Option<DiskRecord> {
    let bsd_name = entry.get_string(keys::BSD_NAME)?;
    if !DeviceIdentifier::is_valid(bsd_name) {
        return None;
    }
    let identifier = DeviceIdentifier::parse(bsd_name).ok()?;

    let ejectable = entry.get_bool(keys::EJECTABLE)?;
    let removable = entry.get_bool(keys::REMOVABLE)?;
    // Content is required for inclusion even though the record keeps it optional.
    let content = entry.get_string(keys::CONTENT)?;
    let size = entry.get_integer(keys::SIZE)?;
    let whole = entry.get_bool(keys::WHOLE)?;
    let open = entry.get_bool(keys::OPEN)?;
    let writable = entry.get_bool(keys::WRITABLE)?;
    let leaf = entry.get_bool(keys::LEAF)?;

    let name = entry
        .get_string(keys::FULL_NAME)
        .or_else(|| entry.get_name())
        .map(str::to_string);

    Some(DiskRecord {
        identifier,
        ejectable,
        removable,
        whole,
        writable,
        open,
        leaf,
        content: Some(content.to_string()),
        size,
        encrypted: entry.get_bool(keys::ENCRYPTED),
        encryption_type: entry.get_string(keys::ENCRYPTION_TYPE).map(str::to_string),
        name,
        uuid: entry.get_string(keys::UUID).and_then(parse_uuid),
        identity_key: IdentityKey::generate(),
    })
}

// Hyphenated form only; anything else is treated as no UUID.
fn parse_uuid(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// Runs one enumeration pass over `cursor` and returns the ordered records.
pub fn simple_list<C: RegistryCursor>(mut cursor: C) -> Vec<DiskRecord> {
    let mut visited = 0usize;
    let mut disks = Vec::new();

    while cursor.advance() {
        let Some(entry) = cursor.current() else {
            continue;
        };
        visited += 1;
        if let Some(record) = build_disk_record(entry) {
            disks.push(record);
        }
    }

    info!(visited, disks = disks.len(), "registry pass complete");
    order_records(disks)
}

/// Serial numbers of every entry that conforms to one of `classes`, in
/// traversal order. Each entry counts once even when it matches several
/// classes.
pub fn serial_numbers<C: RegistryCursor>(mut cursor: C, classes: &[String]) -> Vec<String> {
    let mut serials = Vec::new();

    while cursor.advance() {
        let Some(entry) = cursor.current() else {
            continue;
        };
        if !classes.iter().any(|wanted| entry.conforms_to(wanted)) {
            continue;
        }
        if let Some(serial) = entry.get_string(keys::SERIAL_NUMBER).map(str::trim) {
            if !serial.is_empty() {
                serials.push(serial.to_string());
            }
        }
    }

    serials
}
