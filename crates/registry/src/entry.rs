use std::collections::{BTreeMap, BTreeSet};

/// A property value as stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Boolean(bool),
    Integer(u64),
    SignedInteger(i64),
    Real(f64),
    Data(Vec<u8>),
    Array(Vec<PropertyValue>),
    Dictionary(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            PropertyValue::SignedInteger(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        match u64::try_from(value) {
            Ok(unsigned) => PropertyValue::Integer(unsigned),
            Err(_) => PropertyValue::SignedInteger(value),
        }
    }
}

/// Owned snapshot of one registry entry: its name, class and properties.
///
/// Lookups never fail. A missing key and a value of the wrong type both read
/// as `None`, so callers decide what absence means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryEntry {
    name: Option<String>,
    class_name: Option<String>,
    /// Classes the live object was found to conform to, besides its own.
    conforms: BTreeSet<String>,
    properties: BTreeMap<String, PropertyValue>,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert_property(key, value);
        self
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    pub fn insert_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.property(key)?.as_str()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.property(key)?.as_bool()
    }

    pub fn get_integer(&self, key: &str) -> Option<u64> {
        self.property(key)?.as_unsigned()
    }

    /// The entry's own name, as opposed to any name-like property.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn with_conformance(mut self, class_name: impl Into<String>) -> Self {
        self.add_conformance(class_name);
        self
    }

    pub fn add_conformance(&mut self, class_name: impl Into<String>) {
        self.conforms.insert(class_name.into());
    }

    /// True when the entry's class is `class_name` or was recorded as a
    /// subclass of it. Archive snapshots carry no superclass chain, so for
    /// them this is an exact class match.
    pub fn conforms_to(&self, class_name: &str) -> bool {
        self.class_name() == Some(class_name) || self.conforms.contains(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RegistryEntry {
        RegistryEntry::new("APPLE SSD AP0512Q Media")
            .with_class("IOMedia")
            .with_property("BSD Name", "disk0")
            .with_property("Whole", true)
            .with_property("Size", 500_277_792_768u64)
            .with_property("BSD Unit", 0i64)
            .with_property("Offset", -1i64)
    }

    #[test]
    fn typed_reads() {
        let entry = entry();
        assert_eq!(entry.get_string("BSD Name"), Some("disk0"));
        assert_eq!(entry.get_bool("Whole"), Some(true));
        assert_eq!(entry.get_integer("Size"), Some(500_277_792_768));
        assert_eq!(entry.get_integer("BSD Unit"), Some(0));
        assert_eq!(entry.get_name(), Some("APPLE SSD AP0512Q Media"));
        assert_eq!(entry.class_name(), Some("IOMedia"));
    }

    #[test]
    fn missing_keys_read_as_none() {
        let entry = entry();
        assert_eq!(entry.get_string("Content"), None);
        assert_eq!(entry.get_bool("Leaf"), None);
        assert_eq!(entry.get_integer("Preferred Block Size"), None);
    }

    #[test]
    fn wrong_types_read_as_none() {
        let entry = entry()
            .with_property("Removable", "yes")
            .with_property("Label", 7u64)
            .with_property("Ratio", PropertyValue::Real(0.5));
        assert_eq!(entry.get_bool("BSD Name"), None);
        assert_eq!(entry.get_integer("Whole"), None);
        assert_eq!(entry.get_string("Size"), None);
        assert_eq!(entry.get_bool("Removable"), None);
        assert_eq!(entry.get_string("Label"), None);
        assert_eq!(entry.get_integer("Ratio"), None);
    }

    #[test]
    fn negative_integers_are_not_sizes() {
        let entry = entry();
        assert_eq!(entry.property("Offset"), Some(&PropertyValue::SignedInteger(-1)));
        assert_eq!(entry.get_integer("Offset"), None);
    }

    #[test]
    fn unnamed_entry() {
        let entry = RegistryEntry::default();
        assert_eq!(entry.get_name(), None);
        assert_eq!(entry.class_name(), None);
        assert!(entry.properties().is_empty());
    }

    #[test]
    fn conformance_beyond_own_class() {
        let plain = RegistryEntry::new("ANS").with_class("AppleANS3CGv2Controller");
        assert!(plain.conforms_to("AppleANS3CGv2Controller"));
        assert!(!plain.conforms_to("AppleANS3NVMeController"));

        let live = plain.with_conformance("AppleANS3NVMeController");
        assert!(live.conforms_to("AppleANS3NVMeController"));
        assert!(!live.conforms_to("IOUSBHostDevice"));
        assert!(!RegistryEntry::default().conforms_to("IOMedia"));
    }
}
