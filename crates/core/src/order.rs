use crate::bsd::DeviceIdentifier;
use crate::disk::DiskRecord;
use std::cmp::Ordering;

/// Sort key for an identifier: drive, partition, component count. Absent
/// numbers count as zero.
pub fn order_key(id: &DeviceIdentifier) -> (u32, u32, usize) {
    (
        id.drive_number().unwrap_or(0),
        id.partition_number().unwrap_or(0),
        id.component_count(),
    )
}

pub fn compare_identifiers(a: &DeviceIdentifier, b: &DeviceIdentifier) -> Ordering {
    order_key(a).cmp(&order_key(b))
}

pub fn order_records(mut records: Vec<DiskRecord>) -> Vec<DiskRecord> {
    records.sort_by(|a, b| compare_identifiers(&a.identifier, &b.identifier));
    records
}
