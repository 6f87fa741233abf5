//! Loading `ioreg -a` archives.
//!
//! The archive is a plist in which every dictionary is one registry entry.
//! Three keys are structural, everything else is a property of the entry.

use crate::entry::{PropertyValue, RegistryEntry};
use crate::error::{RegistryError, Result};
use crate::tree::{RegistryNode, RegistryTree};
use plist::{Dictionary, Value};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

pub const ENTRY_NAME_KEY: &str = "IORegistryEntryName";
pub const OBJECT_CLASS_KEY: &str = "IOObjectClass";
pub const CHILDREN_KEY: &str = "IORegistryEntryChildren";

impl RegistryTree {
    /// Reads an XML or binary archive. The top level is either the root
    /// entry itself (`ioreg -a`) or an array of subtree roots (`ioreg -a -r`).
    pub fn from_ioreg_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let value = Value::from_reader(reader)?;
        let roots = match value {
            Value::Dictionary(dict) => vec![node_from_dictionary(dict)?],
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Dictionary(dict) => node_from_dictionary(dict),
                    _ => Err(RegistryError::UnexpectedLayout(
                        "top-level array holds a non-dictionary".to_string(),
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(RegistryError::UnexpectedLayout(
                    "top level is neither a dictionary nor an array".to_string(),
                ))
            }
        };
        let tree = RegistryTree::new(roots);
        debug!(entries = tree.len(), "loaded ioreg archive");
        Ok(tree)
    }

    pub fn from_ioreg_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_ioreg_reader(Cursor::new(bytes))
    }

    pub fn from_ioreg_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_ioreg_bytes(&bytes)
    }
}

fn node_from_dictionary(dict: Dictionary) -> Result<RegistryNode> {
    let mut entry = RegistryEntry::default();
    let mut children = Vec::new();

    for (key, value) in dict {
        match key.as_str() {
            ENTRY_NAME_KEY => entry.set_name(value.into_string()),
            OBJECT_CLASS_KEY => entry.set_class_name(value.into_string()),
            CHILDREN_KEY => {
                let Value::Array(items) = value else {
                    return Err(RegistryError::UnexpectedLayout(format!(
                        "{CHILDREN_KEY} is not an array"
                    )));
                };
                for item in items {
                    let Value::Dictionary(child) = item else {
                        return Err(RegistryError::UnexpectedLayout(format!(
                            "{CHILDREN_KEY} holds a non-dictionary"
                        )));
                    };
                    children.push(node_from_dictionary(child)?);
                }
            }
            _ => {
                if let Some(value) = convert(value) {
                    entry.insert_property(key, value);
                }
            }
        }
    }

    Ok(RegistryNode { entry, children })
}

// Dates and UIDs never show up in the properties we read; drop them.
fn convert(value: Value) -> Option<PropertyValue> {
    let converted = match value {
        Value::String(value) => PropertyValue::String(value),
        Value::Boolean(value) => PropertyValue::Boolean(value),
        Value::Integer(value) => match value.as_unsigned() {
            Some(unsigned) => PropertyValue::Integer(unsigned),
            None => PropertyValue::SignedInteger(value.as_signed()?),
        },
        Value::Real(value) => PropertyValue::Real(value),
        Value::Data(bytes) => PropertyValue::Data(bytes),
        Value::Array(items) => PropertyValue::Array(items.into_iter().filter_map(convert).collect()),
        Value::Dictionary(dict) => PropertyValue::Dictionary(
            dict.into_iter()
                .filter_map(|(key, value)| convert(value).map(|value| (key, value)))
                .collect::<BTreeMap<_, _>>(),
        ),
        _ => return None,
    };
    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RegistryCursor;
    use std::io::Write;

    const ARCHIVE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>IORegistryEntryName</key><string>Root</string>
  <key>IOObjectClass</key><string>IORegistryEntry</string>
  <key>IOKitBuildVersion</key><string>Darwin Kernel Version 23.5.0</string>
  <key>IORegistryEntryChildren</key>
  <array>
    <dict>
      <key>IORegistryEntryName</key><string>AppleANS3NVMeController</string>
      <key>IOObjectClass</key><string>AppleANS3NVMeController</string>
      <key>Serial Number</key><string>  0ba0176a4c21e634 </string>
      <key>IORegistryEntryChildren</key>
      <array>
        <dict>
          <key>IORegistryEntryName</key><string>APPLE SSD AP0512Q Media</string>
          <key>IOObjectClass</key><string>IOMedia</string>
          <key>BSD Name</key><string>disk0</string>
          <key>Whole</key><true/>
          <key>Size</key><integer>500277792768</integer>
          <key>Offset</key><integer>-1</integer>
          <key>Ratio</key><real>0.5</real>
          <key>Blob</key><data>AAEC</data>
          <key>Created</key><date>2024-06-09T00:00:00Z</date>
          <key>Statistics</key><dict><key>Reads</key><integer>42</integer></dict>
        </dict>
      </array>
    </dict>
  </array>
</dict>
</plist>"#;

    fn names(tree: &RegistryTree) -> Vec<String> {
        let mut cursor = tree.cursor();
        let mut names = Vec::new();
        while cursor.advance() {
            names.push(cursor.current().and_then(|e| e.get_name()).unwrap_or("?").to_string());
        }
        names
    }

    #[test]
    fn parses_nested_archive() {
        let tree = RegistryTree::from_ioreg_bytes(ARCHIVE.as_bytes()).unwrap();
        assert_eq!(
            names(&tree),
            vec!["Root", "AppleANS3NVMeController", "APPLE SSD AP0512Q Media"]
        );

        let media = &tree.roots()[0].children[0].children[0].entry;
        assert_eq!(media.class_name(), Some("IOMedia"));
        assert_eq!(media.get_string("BSD Name"), Some("disk0"));
        assert_eq!(media.get_bool("Whole"), Some(true));
        assert_eq!(media.get_integer("Size"), Some(500_277_792_768));
        assert_eq!(media.property("Offset"), Some(&PropertyValue::SignedInteger(-1)));
        assert_eq!(media.property("Ratio"), Some(&PropertyValue::Real(0.5)));
        assert_eq!(media.property("Blob"), Some(&PropertyValue::Data(vec![0, 1, 2])));
        assert_eq!(media.property("Created"), None);
        assert!(matches!(media.property("Statistics"), Some(PropertyValue::Dictionary(d)) if d.len() == 1));
        assert_eq!(media.property(ENTRY_NAME_KEY), None);
        assert_eq!(media.property(CHILDREN_KEY), None);
    }

    #[test]
    fn parses_array_of_subtrees() {
        let archive = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<array>
  <dict><key>IORegistryEntryName</key><string>disk2</string></dict>
  <dict><key>IORegistryEntryName</key><string>disk3</string></dict>
</array>
</plist>"#;
        let tree = RegistryTree::from_ioreg_bytes(archive.as_bytes()).unwrap();
        assert_eq!(names(&tree), vec!["disk2", "disk3"]);
    }

    #[test]
    fn rejects_scalar_top_level() {
        let archive = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><string>nope</string></plist>"#;
        assert!(matches!(
            RegistryTree::from_ioreg_bytes(archive.as_bytes()),
            Err(RegistryError::UnexpectedLayout(_))
        ));
    }

    #[test]
    fn rejects_truncated_archive() {
        assert!(matches!(
            RegistryTree::from_ioreg_bytes(b"<plist version=\"1.0\"><dict><key>Size</key>"),
            Err(RegistryError::Plist(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ARCHIVE.as_bytes()).unwrap();
        let tree = RegistryTree::from_ioreg_file(file.path()).unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RegistryTree::from_ioreg_file(dir.path().join("absent.plist")),
            Err(RegistryError::Io(_))
        ));
    }
}
