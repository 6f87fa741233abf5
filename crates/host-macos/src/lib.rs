mod config;
mod disks;
#[cfg(target_os = "macos")]
mod iokit;
pub mod keys;
mod processes;

pub use config::{load_config, resolve_config, EnumerationConfig, RegistrySource, CONFIG_ENV};
pub use disks::{build_disk_record, serial_numbers, simple_list};
pub use processes::{list_processes, ProcessInfo};
#[cfg(target_os = "macos")]
pub use iokit::IoKitCursor;

use anyhow::{anyhow, Context, Result};
use devtree_core::{DiskRecord, DiskReport, HostInfo};
use devtree_registry::RegistryTree;
use std::process::Command;
use tracing::{debug, warn};

pub fn build_disk_report(config: &EnumerationConfig) -> Result<DiskReport> {
    let (disks, serials) = scan(&config.source, &config.serial_controller_classes)?;
    Ok(DiskReport::new(host_info(), serials, disks))
}

/// One ordered enumeration pass, without serial numbers or host info.
pub fn list_disks(source: &RegistrySource) -> Result<Vec<DiskRecord>> {
    let (disks, _) = scan(source, &[])?;
    Ok(disks)
}

fn scan(source: &RegistrySource, serial_classes: &[String]) -> Result<(Vec<DiskRecord>, Vec<String>)> {
    debug!(?source, "scanning registry");
    match source {
        RegistrySource::Live => scan_live(serial_classes),
        RegistrySource::Ioreg => {
            let archive = capture_ioreg_archive()?;
            let tree = RegistryTree::from_ioreg_bytes(&archive).context("parse ioreg output")?;
            Ok(scan_tree(&tree, serial_classes))
        }
        RegistrySource::Snapshot(path) => {
            let tree = RegistryTree::from_ioreg_file(path)
                .with_context(|| format!("load registry snapshot {}", path.display()))?;
            Ok(scan_tree(&tree, serial_classes))
        }
    }
}

fn scan_tree(tree: &RegistryTree, serial_classes: &[String]) -> (Vec<DiskRecord>, Vec<String>) {
    let disks = simple_list(tree.cursor());
    let serials = if serial_classes.is_empty() {
        Vec::new()
    } else {
        serial_numbers(tree.cursor(), serial_classes)
    };
    (disks, serials)
}

#[cfg(target_os = "macos")]
fn scan_live(serial_classes: &[String]) -> Result<(Vec<DiskRecord>, Vec<String>)> {
    let disks = simple_list(IoKitCursor::open()?);
    if serial_classes.is_empty() {
        return Ok((disks, Vec::new()));
    }
    // A failed serial lookup still leaves a usable disk list.
    let serials = match IoKitCursor::open_conforming(serial_classes) {
        Ok(cursor) => serial_numbers(cursor, serial_classes),
        Err(err) => {
            warn!("serial number lookup skipped: {err:#}");
            Vec::new()
        }
    };
    Ok((disks, serials))
}

#[cfg(not(target_os = "macos"))]
fn scan_live(_serial_classes: &[String]) -> Result<(Vec<DiskRecord>, Vec<String>)> {
    Err(anyhow!("live registry access requires macOS; use a snapshot source"))
}

/// Raw `ioreg -a -l` archive of the whole registry.
pub fn capture_ioreg_archive() -> Result<Vec<u8>> {
    let output = Command::new("ioreg")
        .args(["-a", "-l"])
        .output()
        .context("run ioreg")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(status = %output.status, "ioreg failed");
        return Err(anyhow!("ioreg exited with {}: {}", output.status, stderr));
    }
    Ok(output.stdout)
}

pub fn host_info() -> HostInfo {
    HostInfo {
        os: std::env::consts::OS.to_string(),
        os_version: read_os_version(),
        machine: read_machine(),
    }
}

#[cfg(target_os = "macos")]
fn read_os_version() -> String {
    sysctl_string("kern.osproductversion")
        .or_else(|| sysctl_string("kern.osrelease"))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "macos")]
fn read_machine() -> String {
    sysctl_string("hw.model")
        .or_else(|| sysctl_string("kern.hostname"))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(not(target_os = "macos"))]
fn read_os_version() -> String {
    "unknown".to_string()
}

#[cfg(not(target_os = "macos"))]
fn read_machine() -> String {
    "unknown".to_string()
}

#[cfg(target_os = "macos")]
fn sysctl_string(name: &str) -> Option<String> {
    use libc::sysctlbyname;
    use std::ffi::CString;
    use std::ptr;

    let c_name = CString::new(name).ok()?;
    let mut size = 0usize;
    let res = unsafe { sysctlbyname(c_name.as_ptr(), ptr::null_mut(), &mut size, ptr::null_mut(), 0) };
    if res != 0 || size == 0 {
        return None;
    }

    let mut buffer = vec![0u8; size];
    let res = unsafe {
        sysctlbyname(
            c_name.as_ptr(),
            buffer.as_mut_ptr() as *mut _,
            &mut size,
            ptr::null_mut(),
            0,
        )
    };
    if res != 0 {
        return None;
    }
    buffer.truncate(size);
    if let Some(0) = buffer.last().copied() {
        buffer.pop();
    }
    String::from_utf8(buffer).ok()
}
