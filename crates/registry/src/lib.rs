//! Typed access to hardware registry entries and step-wise traversal of the
//! registry tree.
//!
//! Entries are owned snapshots (`RegistryEntry`), so a cursor never hands out
//! anything that outlives its current position. `RegistryTree` holds a whole
//! snapshot in memory, either built by hand or loaded from an `ioreg -a`
//! archive.

mod entry;
mod error;
pub mod ioreg;
mod tree;

pub use entry::{PropertyValue, RegistryEntry};
pub use error::{RegistryError, Result};
pub use tree::{RegistryCursor, RegistryNode, RegistryTree, TreeCursor};
