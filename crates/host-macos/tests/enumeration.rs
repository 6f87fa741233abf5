use devtree_host_macos::{
    build_disk_report, keys, list_disks, simple_list, EnumerationConfig, RegistrySource,
};
use devtree_registry::{RegistryEntry, RegistryNode, RegistryTree};
use std::io::Write;
use uuid::Uuid;

fn media(bsd_name: &str, whole: bool) -> RegistryEntry {
    RegistryEntry::new(format!("{bsd_name} media"))
        .with_class("IOMedia")
        .with_property(keys::BSD_NAME, bsd_name)
        .with_property(keys::EJECTABLE, false)
        .with_property(keys::REMOVABLE, false)
        .with_property(keys::WHOLE, whole)
        .with_property(keys::OPEN, true)
        .with_property(keys::WRITABLE, true)
        .with_property(keys::LEAF, !whole)
}

fn two_disk_registry() -> RegistryTree {
    let disk = media("disk0", true)
        .with_property(keys::CONTENT, "GUID_partition_scheme")
        .with_property(keys::SIZE, 500_107_862_016u64);
    let partition = media("disk0s1", false)
        .with_property(keys::CONTENT, "C12A7328-F81F-11D2-BA4B-00A0C93EC93B")
        .with_property(keys::SIZE, 524_288_000u64)
        .with_property(keys::UUID, "123E4567-E89B-12D3-A456-426614174000");

    // Partition listed first to show ordering does not follow traversal.
    RegistryTree::new(vec![RegistryNode::new(RegistryEntry::new("Root"))
        .with_child(RegistryNode::new(RegistryEntry::new("IOBlockStorageDriver")))
        .with_child(RegistryNode::new(partition))
        .with_child(RegistryNode::new(disk))])
}

#[test]
fn whole_disk_then_partition() {
    let disks = simple_list(two_disk_registry().cursor());
    assert_eq!(disks.len(), 2);

    let disk = &disks[0];
    assert_eq!(disk.identifier.raw_value(), "disk0");
    assert_eq!(disk.identifier.drive_number(), Some(0));
    assert_eq!(disk.identifier.partition_number(), None);
    assert!(disk.whole);
    assert_eq!(disk.content.as_deref(), Some("GUID_partition_scheme"));
    assert_eq!(disk.size, 500_107_862_016);
    assert_eq!(disk.uuid, None);

    let partition = &disks[1];
    assert_eq!(partition.identifier.raw_value(), "disk0s1");
    assert_eq!(partition.identifier.drive_number(), Some(0));
    assert_eq!(partition.identifier.partition_number(), Some(1));
    assert!(!partition.whole);
    assert_eq!(
        partition.uuid,
        Some(Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap())
    );
}

#[test]
fn repeated_passes_match_except_identity_keys() {
    let tree = two_disk_registry();
    let first = simple_list(tree.cursor());
    let second = simple_list(tree.cursor());

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_ne!(a.identity_key, b.identity_key);
        let mut b = b.clone();
        b.identity_key = a.identity_key;
        assert_eq!(a, &b);
    }
    assert_eq!(first[1].id(), second[1].id());
    assert_ne!(first[0].id(), second[0].id());
}

#[test]
fn missing_writable_drops_only_that_node() {
    let mut broken = RegistryEntry::default();
    let source = media("disk3", true)
        .with_property(keys::CONTENT, "FDisk_partition_scheme")
        .with_property(keys::SIZE, 16_008_609_792u64);
    for (key, value) in source.properties() {
        if key != keys::WRITABLE {
            broken.insert_property(key.clone(), value.clone());
        }
    }
    let tree = RegistryTree::new(vec![
        RegistryNode::new(broken),
        RegistryNode::new(
            media("disk4", true)
                .with_property(keys::CONTENT, "FDisk_partition_scheme")
                .with_property(keys::SIZE, 16_008_609_792u64),
        ),
    ]);

    let disks = simple_list(tree.cursor());
    let names: Vec<&str> = disks.iter().map(|d| d.identifier.raw_value()).collect();
    assert_eq!(names, vec!["disk4"]);
}

const SNAPSHOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>IORegistryEntryName</key><string>Root</string>
  <key>IOObjectClass</key><string>IORegistryEntry</string>
  <key>IORegistryEntryChildren</key>
  <array>
    <dict>
      <key>IORegistryEntryName</key><string>ANS</string>
      <key>IOObjectClass</key><string>AppleANS3NVMeController</string>
      <key>Serial Number</key><string>0ba0176a4c21e634</string>
      <key>IORegistryEntryChildren</key>
      <array>
        <dict>
          <key>IORegistryEntryName</key><string>APPLE SSD AP0512Q Media</string>
          <key>IOObjectClass</key><string>IOMedia</string>
          <key>BSD Name</key><string>disk0</string>
          <key>Content</key><string>GUID_partition_scheme</string>
          <key>Ejectable</key><false/>
          <key>Removable</key><false/>
          <key>Leaf</key><false/>
          <key>Open</key><true/>
          <key>Whole</key><true/>
          <key>Writable</key><true/>
          <key>Size</key><integer>500277792768</integer>
          <key>IORegistryEntryChildren</key>
          <array>
            <dict>
              <key>IORegistryEntryName</key><string>Container</string>
              <key>IOObjectClass</key><string>IOMedia</string>
              <key>BSD Name</key><string>disk0s2</string>
              <key>Content</key><string>7C3457EF-0000-11AA-AA11-00306543ECAC</string>
              <key>Ejectable</key><false/>
              <key>Removable</key><false/>
              <key>Leaf</key><true/>
              <key>Open</key><true/>
              <key>Whole</key><false/>
              <key>Writable</key><true/>
              <key>Size</key><integer>494384795648</integer>
              <key>Encrypted</key><true/>
              <key>EncryptionType</key><string>AES-XTS</string>
              <key>UUID</key><string>7E8D4C4A-3B7E-4F3C-9D2A-0F1E2D3C4B5A</string>
            </dict>
            <dict>
              <key>IORegistryEntryName</key><string>iBootSystemContainer</string>
              <key>IOObjectClass</key><string>IOMedia</string>
              <key>BSD Name</key><string>disk0s1</string>
              <key>Content</key><string>69646961-6700-11AA-AA11-00306543ECAC</string>
              <key>Ejectable</key><false/>
              <key>Removable</key><false/>
              <key>Leaf</key><true/>
              <key>Open</key><true/>
              <key>Whole</key><false/>
              <key>Writable</key><true/>
              <key>Size</key><integer>524288000</integer>
              <key>UUID</key><string>garbage</string>
            </dict>
          </array>
        </dict>
      </array>
    </dict>
  </array>
</dict>
</plist>"#;

fn snapshot_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    file
}

#[test]
fn snapshot_source_lists_ordered_disks() {
    let file = snapshot_file();
    let disks = list_disks(&RegistrySource::Snapshot(file.path().to_path_buf())).unwrap();
    let names: Vec<&str> = disks.iter().map(|d| d.identifier.raw_value()).collect();
    assert_eq!(names, vec!["disk0", "disk0s1", "disk0s2"]);

    assert_eq!(disks[1].uuid, None);
    assert_eq!(disks[1].name.as_deref(), Some("iBootSystemContainer"));
    assert_eq!(disks[2].encrypted, Some(true));
    assert_eq!(disks[2].active_encryption_type(), Some("AES-XTS"));
}

#[test]
fn report_from_snapshot_includes_serials() {
    let file = snapshot_file();
    let config = EnumerationConfig {
        source: RegistrySource::Snapshot(file.path().to_path_buf()),
        ..EnumerationConfig::default()
    };
    let report = build_disk_report(&config).unwrap();
    assert_eq!(report.serial_numbers, vec!["0ba0176a4c21e634".to_string()]);
    assert_eq!(report.disks.len(), 3);
    assert_eq!(report.host.os, std::env::consts::OS);

    let json: serde_json::Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
    assert_eq!(json["disks"][0]["identifier"], "disk0");
    assert_eq!(json["disks"][2]["encryption_type"], "AES-XTS");
}
