//! An insertion-ordered target list deduplicated by identity.
//!
//! Dependency aggregation cares about *which* target object contributed,
//! not about structural equality, so membership is keyed on the `Arc`
//! allocation address. First insertion wins the position; later duplicates
//! are ignored.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::target::Target;

#[derive(Debug, Default)]
pub struct UniqueTargetList {
    items: Vec<Arc<Target>>,
    seen: FxHashSet<usize>,
}

impl UniqueTargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `target` unless it is already present. Returns whether the
    /// target was inserted.
    pub fn push(&mut self, target: &Arc<Target>) -> bool {
        if self.seen.insert(Arc::as_ptr(target) as usize) {
            self.items.push(Arc::clone(target));
            true
        } else {
            false
        }
    }

    pub fn contains(&self, target: &Arc<Target>) -> bool {
        self.seen.contains(&(Arc::as_ptr(target) as usize))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Target>> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Target>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a UniqueTargetList {
    type Item = &'a Arc<Target>;
    type IntoIter = std::slice::Iter<'a, Arc<Target>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use carton_foundation::Label;

    use super::*;
    use crate::bundle_data::BundleData;
    use crate::target::TargetKind;

    fn group(label: &str) -> Arc<Target> {
        Arc::new(Target::new(
            Label::parse(label).unwrap(),
            TargetKind::Group,
            Vec::new(),
            None,
            Vec::new(),
            BundleData::new(),
        ))
    }

    #[test]
    fn dedup_keeps_first_insertion_order() {
        let a = group("//a");
        let b = group("//b");
        let mut list = UniqueTargetList::new();

        assert!(list.push(&a));
        assert!(list.push(&b));
        assert!(!list.push(&a));

        let labels: Vec<String> = list.iter().map(|t| t.label().to_string()).collect();
        assert_eq!(labels, vec!["//a:a", "//b:b"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn identity_not_value_equality() {
        // Two separately-allocated targets with identical contents are
        // distinct members.
        let a1 = group("//a");
        let a2 = group("//a");
        let mut list = UniqueTargetList::new();

        assert!(list.push(&a1));
        assert!(list.push(&a2));
        assert_eq!(list.len(), 2);
        assert!(list.contains(&a1));
        assert!(list.contains(&a2));
    }
}
