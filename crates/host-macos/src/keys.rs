//! Registry property names read by the disk builder.

pub const BSD_NAME: &str = "BSD Name";
pub const EJECTABLE: &str = "Ejectable";
pub const REMOVABLE: &str = "Removable";
pub const CONTENT: &str = "Content";
pub const SIZE: &str = "Size";
pub const WHOLE: &str = "Whole";
pub const OPEN: &str = "Open";
pub const WRITABLE: &str = "Writable";
pub const LEAF: &str = "Leaf";
pub const FULL_NAME: &str = "FullName";
pub const ENCRYPTED: &str = "Encrypted";
pub const ENCRYPTION_TYPE: &str = "EncryptionType";
pub const UUID: &str = "UUID";

pub const SERIAL_NUMBER: &str = "Serial Number";
