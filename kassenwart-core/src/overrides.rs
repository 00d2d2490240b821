//! Reviewer corrections, kept apart from classifier output and merged at
//! read time so classification stays re-derivable.

use std::collections::HashMap;

use crate::transaction::{Category, Transaction};

/// Sparse map of reviewer edits keyed by row index in the loaded statement.
///
/// Identity is positional on purpose: duplicate bookings are legal, so it
/// cannot be derived from row content. The store lives exactly as long as
/// the statement it was recorded against.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    entries: HashMap<usize, Override>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Override {
    member: Option<bool>,
    category: Option<Category>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_member_flag(&mut self, id: usize, member: bool) {
        self.entries.entry(id).or_default().member = Some(member);
    }

    pub fn set_category(&mut self, id: usize, category: Category) {
        self.entries.entry(id).or_default().category = Some(category);
    }

    /// The reviewer's member flag for `id`, if one was recorded.
    pub fn member_flag(&self, id: usize) -> Option<bool> {
        self.entries.get(&id).and_then(|o| o.member)
    }

    /// The reviewer's category for `id`, if one was recorded.
    pub fn category(&self, id: usize) -> Option<Category> {
        self.entries.get(&id).and_then(|o| o.category)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge the override for `id` onto classifier output, field-wise.
    /// Absent fields keep the classifier's values.
    pub fn apply(&self, id: usize, txn: &mut Transaction) {
        if let Some(o) = self.entries.get(&id) {
            if let Some(member) = o.member {
                txn.is_member = member;
            }
            if let Some(category) = o.category {
                txn.category = category;
            }
        }
    }
}
