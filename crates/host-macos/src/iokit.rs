//! Live cursor over the IOKit registry.

use anyhow::{anyhow, Result};
use core_foundation::base::{kCFAllocatorDefault, CFAllocatorRef, CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef, CFMutableDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use devtree_registry::{PropertyValue, RegistryCursor, RegistryEntry};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr;

type KernReturn = c_int;
type MachPort = c_uint;
type IoObject = MachPort;
type IoOptionBits = u32;
type IoName = [c_char; 128];

const KERN_SUCCESS: KernReturn = 0;
const IO_OBJECT_NULL: IoObject = 0;
// kIOMainPortDefault (macOS 12+) and kIOMasterPortDefault are both MACH_PORT_NULL.
const MAIN_PORT_DEFAULT: MachPort = 0;
const REGISTRY_ITERATE_RECURSIVELY: IoOptionBits = 0x0000_0001;
const SERVICE_PLANE: &CStr = c"IOService";

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IORegistryCreateIterator(
        main_port: MachPort,
        plane: *const c_char,
        options: IoOptionBits,
        iterator: *mut IoObject,
    ) -> KernReturn;
    fn IOIteratorNext(iterator: IoObject) -> IoObject;
    fn IOObjectRelease(object: IoObject) -> KernReturn;
    fn IOObjectGetClass(object: IoObject, class_name: *mut c_char) -> KernReturn;
    fn IOObjectConformsTo(object: IoObject, class_name: *const c_char) -> c_int;
    fn IORegistryEntryGetName(entry: IoObject, name: *mut c_char) -> KernReturn;
    fn IORegistryEntryCreateCFProperties(
        entry: IoObject,
        properties: *mut CFMutableDictionaryRef,
        allocator: CFAllocatorRef,
        options: IoOptionBits,
    ) -> KernReturn;
}

/// Recursive walk of the `IOService` plane.
///
/// Each step copies the entry's name, class and scalar properties into an
/// owned `RegistryEntry` and releases the IOKit object right away, so nothing
/// borrowed from IOKit survives past `advance`.
pub struct IoKitCursor {
    iterator: IoObject,
    current: Option<RegistryEntry>,
    exhausted: bool,
    conformance: Vec<(String, CString)>,
}

impl IoKitCursor {
    pub fn open() -> Result<Self> {
        Self::open_conforming(&[])
    }

    /// Like `open`, but also records which of `classes` each entry conforms
    /// to through its superclass chain, for `RegistryEntry::conforms_to`.
    pub fn open_conforming(classes: &[String]) -> Result<Self> {
        let conformance = classes
            .iter()
            .filter_map(|class| Some((class.clone(), CString::new(class.as_str()).ok()?)))
            .collect();
        let mut iterator = IO_OBJECT_NULL;
        let kr = unsafe {
            IORegistryCreateIterator(
                MAIN_PORT_DEFAULT,
                SERVICE_PLANE.as_ptr(),
                REGISTRY_ITERATE_RECURSIVELY,
                &mut iterator,
            )
        };
        if kr != KERN_SUCCESS || iterator == IO_OBJECT_NULL {
            return Err(anyhow!("IORegistryCreateIterator failed: {kr:#x}"));
        }
        Ok(Self {
            iterator,
            current: None,
            exhausted: false,
            conformance,
        })
    }
}

impl RegistryCursor for IoKitCursor {
    fn advance(&mut self) -> bool {
        self.current = None;
        if self.exhausted {
            return false;
        }
        let object = unsafe { IOIteratorNext(self.iterator) };
        if object == IO_OBJECT_NULL {
            self.exhausted = true;
            return false;
        }
        let mut entry = snapshot_entry(object);
        for (class, c_class) in &self.conformance {
            if unsafe { IOObjectConformsTo(object, c_class.as_ptr()) } != 0 {
                entry.add_conformance(class.clone());
            }
        }
        self.current = Some(entry);
        unsafe {
            IOObjectRelease(object);
        }
        true
    }

    fn current(&self) -> Option<&RegistryEntry> {
        self.current.as_ref()
    }
}

impl Drop for IoKitCursor {
    fn drop(&mut self) {
        unsafe {
            IOObjectRelease(self.iterator);
        }
    }
}

fn snapshot_entry(object: IoObject) -> RegistryEntry {
    let mut entry = RegistryEntry::default();
    entry.set_name(read_name(|buf| unsafe { IORegistryEntryGetName(object, buf) }));
    entry.set_class_name(read_name(|buf| unsafe { IOObjectGetClass(object, buf) }));

    let mut properties: CFMutableDictionaryRef = ptr::null_mut();
    let kr = unsafe {
        IORegistryEntryCreateCFProperties(object, &mut properties, kCFAllocatorDefault, 0)
    };
    if kr != KERN_SUCCESS || properties.is_null() {
        return entry;
    }

    let dict: CFDictionary<CFString, CFType> =
        unsafe { CFDictionary::wrap_under_create_rule(properties as CFDictionaryRef) };
    let (keys, values) = dict.get_keys_and_values();
    for (key, value) in keys.into_iter().zip(values) {
        let key = unsafe { CFString::wrap_under_get_rule(key as CFStringRef) };
        let value = unsafe { CFType::wrap_under_get_rule(value as CFTypeRef) };
        if let Some(value) = convert(&value) {
            entry.insert_property(key.to_string(), value);
        }
    }
    entry
}

fn read_name(fetch: impl FnOnce(*mut c_char) -> KernReturn) -> Option<String> {
    let mut buf: IoName = [0; 128];
    if fetch(buf.as_mut_ptr()) != KERN_SUCCESS {
        return None;
    }
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(name.to_string_lossy().into_owned())
}

// Nested arrays and dictionaries are skipped; the disk builder only reads scalars.
fn convert(value: &CFType) -> Option<PropertyValue> {
    if let Some(string) = value.downcast::<CFString>() {
        return Some(PropertyValue::String(string.to_string()));
    }
    if let Some(boolean) = value.downcast::<CFBoolean>() {
        return Some(PropertyValue::Boolean(boolean.into()));
    }
    if let Some(number) = value.downcast::<CFNumber>() {
        return number.to_i64().map(PropertyValue::from);
    }
    if let Some(data) = value.downcast::<CFData>() {
        return Some(PropertyValue::Data(data.bytes().to_vec()));
    }
    None
}
