//! Read-only accessor over the generated signature table.
//!
//! The table is produced offline and injected at dispatcher construction;
//! it is immutable for the process lifetime and not guaranteed sorted, so
//! lookup is a linear scan. On duplicate hashes (a generator defect) the
//! first entry wins.

use crate::types::Signature;

/// View over an ordered sequence of command signatures.
#[derive(Debug, Clone, Copy)]
pub struct SignatureTable<'t> {
    entries: &'t [Signature],
}

impl<'t> SignatureTable<'t> {
    /// Wrap a generated table.
    pub const fn new(entries: &'t [Signature]) -> Self {
        Self { entries }
    }

    /// Number of registered commands.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries, in table order.
    pub fn entries(&self) -> &'t [Signature] {
        self.entries
    }

    /// Find the first signature whose name hash equals `hash`.
    pub fn lookup(&self, hash: u32) -> Option<&'t Signature> {
        self.entries.iter().find(|sig| sig.hash == hash)
    }
}

// ==================== TESTS =======================
