use devtree_core::DiskRecord;
use devtree_host_macos::ProcessInfo;

/// One human-readable line per record.
///
/// Whole disks show their content as a label, partitions their UUID. An
/// unknown encryption state prints as `false`.
pub fn disk_line(record: &DiskRecord) -> String {
    let mut line = format!("BSD Name: {}", record.identifier);
    if record.whole {
        if let Some(content) = &record.content {
            line.push_str(&format!(", Label: {content}"));
        }
    } else if let Some(uuid) = record.uuid {
        line.push_str(&format!(", UUID: {}", uuid.hyphenated().to_string().to_uppercase()));
    }

    let encrypted = record.encrypted.unwrap_or(false);
    line.push_str(&format!(", Encrypted: {encrypted}"));
    if let Some(kind) = record.active_encryption_type() {
        line.push_str(&format!(", EncryptionType: {kind}"));
    }

    line.push_str(&format!(", Open: {}, Writable: {}", record.open, record.writable));
    line
}

/// `major.minor_patch`, e.g. `14.5_0` for a product version of `14.5`.
/// Anything that does not start with a number is shown unchanged.
pub fn os_version(raw: &str) -> String {
    let mut parts = raw.trim().split('.').map(str::parse::<u32>);
    let Some(Ok(major)) = parts.next() else {
        return raw.to_string();
    };
    let minor = parts.next().and_then(Result::ok).unwrap_or(0);
    let patch = parts.next().and_then(Result::ok).unwrap_or(0);
    format!("{major}.{minor}_{patch}")
}

pub fn process_line(process: &ProcessInfo) -> String {
    format!("{}: {}, path={}", process.pid, process.name, process.path.display())
}
