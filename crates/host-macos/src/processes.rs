use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A running process with a resolvable executable path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: i32,
    /// Last component of `path`.
    pub name: String,
    pub path: PathBuf,
}

impl ProcessInfo {
    pub fn from_path(pid: i32, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { pid, name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Every process whose executable path can be read, in the order the kernel
/// lists them. Processes that exit mid-listing or hide their path are skipped.
#[cfg(target_os = "macos")]
pub fn list_processes() -> Result<Vec<ProcessInfo>> {
    use anyhow::anyhow;
    use std::ffi::CStr;
    use std::os::raw::{c_char, c_int, c_void};
    use tracing::debug;

    let estimate = unsafe { libc::proc_listallpids(std::ptr::null_mut(), 0) };
    if estimate <= 0 {
        return Err(anyhow!(
            "proc_listallpids failed: {}",
            std::io::Error::last_os_error()
        ));
    }

    // Room for processes started between the two calls.
    let mut pids: Vec<c_int> = vec![0; estimate as usize + 32];
    let buffer_bytes = (pids.len() * std::mem::size_of::<c_int>()) as c_int;
    let count = unsafe { libc::proc_listallpids(pids.as_mut_ptr() as *mut c_void, buffer_bytes) };
    if count <= 0 {
        return Err(anyhow!(
            "proc_listallpids failed: {}",
            std::io::Error::last_os_error()
        ));
    }
    pids.truncate(count as usize);

    let mut processes = Vec::with_capacity(pids.len());
    let mut path_buf = vec![0u8; libc::PROC_PIDPATHINFO_MAXSIZE as usize];
    for pid in pids {
        let len = unsafe {
            libc::proc_pidpath(pid, path_buf.as_mut_ptr() as *mut c_void, path_buf.len() as u32)
        };
        if len <= 0 {
            continue;
        }
        let path = unsafe { CStr::from_ptr(path_buf.as_ptr() as *const c_char) };
        processes.push(ProcessInfo::from_path(pid, path.to_string_lossy().into_owned()));
    }

    debug!(listed = count, with_path = processes.len(), "process table read");
    Ok(processes)
}

#[cfg(not(target_os = "macos"))]
pub fn list_processes() -> Result<Vec<ProcessInfo>> {
    Err(anyhow::anyhow!("process listing requires macOS"))
}
