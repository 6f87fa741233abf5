use crate::entry::RegistryEntry;

/// Step-wise, pre-order walk over registry entries.
///
/// A cursor is single-pass: once `advance` returns `false` it stays
/// exhausted. `current` is `None` before the first `advance` and after
/// exhaustion. The borrow returned by `current` ends before the next
/// `advance`, so everything needed from an entry has to be read first.
pub trait RegistryCursor {
    fn advance(&mut self) -> bool;

    fn current(&self) -> Option<&RegistryEntry>;
}

impl<C: RegistryCursor + ?Sized> RegistryCursor for &mut C {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn current(&self) -> Option<&RegistryEntry> {
        (**self).current()
    }
}

impl<C: RegistryCursor + ?Sized> RegistryCursor for Box<C> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn current(&self) -> Option<&RegistryEntry> {
        (**self).current()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryNode {
    pub entry: RegistryEntry,
    pub children: Vec<RegistryNode>,
}

impl RegistryNode {
    pub fn new(entry: RegistryEntry) -> Self {
        Self {
            entry,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: RegistryNode) -> Self {
        self.children.push(child);
        self
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(RegistryNode::count).sum::<usize>()
    }
}

/// An in-memory registry snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryTree {
    roots: Vec<RegistryNode>,
}

impl RegistryTree {
    pub fn new(roots: Vec<RegistryNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[RegistryNode] {
        &self.roots
    }

    /// Total number of entries, roots included.
    pub fn len(&self) -> usize {
        self.roots.iter().map(RegistryNode::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::new(&self.roots)
    }
}

/// Pre-order cursor over a `RegistryTree`: a node, then its children in order.
#[derive(Debug)]
pub struct TreeCursor<'a> {
    pending: Vec<&'a RegistryNode>,
    current: Option<&'a RegistryNode>,
}

impl<'a> TreeCursor<'a> {
    fn new(roots: &'a [RegistryNode]) -> Self {
        Self {
            pending: roots.iter().rev().collect(),
            current: None,
        }
    }
}

impl RegistryCursor for TreeCursor<'_> {
    fn advance(&mut self) -> bool {
        self.current = self.pending.pop();
        match self.current {
            Some(node) => {
                self.pending.extend(node.children.iter().rev());
                true
            }
            None => false,
        }
    }

    fn current(&self) -> Option<&RegistryEntry> {
        self.current.map(|node| &node.entry)
    }
}
