//! The active-category filter: a mutable set of visible spending categories
//! and its derived bitmask encoding.

use crate::model::{Category, Transaction};
use std::collections::HashSet;

/// The user-controlled set of currently visible spending categories.
///
/// The bitmask is always derived from the current membership and the fixed
/// order of [`Category::ALL`], so no caller can observe a stale encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    active: HashSet<Category>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a category. Returns false if it was already active.
    pub fn add(&mut self, category: Category) -> bool {
        self.active.insert(category)
    }

    /// Deactivates a category. Returns false if it was not active.
    pub fn remove(&mut self, category: Category) -> bool {
        self.active.remove(&category)
    }

    /// Deactivates every category.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Activates every category.
    pub fn fill_all(&mut self) {
        self.active.extend(Category::ALL);
    }

    pub fn contains(&self, category: Category) -> bool {
        self.active.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// The active categories in bitmask order.
    pub fn active(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.active.contains(c))
            .collect()
    }

    /// Encodes the membership as a fixed-width bitstring, one character per
    /// category in [`Category::ALL`] order: '1' when active, '0' otherwise.
    /// Used as the filter component of every cache key.
    pub fn bitmask(&self) -> String {
        Category::ALL
            .iter()
            .map(|c| if self.active.contains(c) { '1' } else { '0' })
            .collect()
    }

    /// Whether a transaction's main category is currently visible.
    ///
    /// When nothing is selected, nothing is shown. The empty set matches no
    /// transaction rather than all of them.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.active
            .iter()
            .any(|c| c.as_str() == transaction.main_category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::tx;

    #[test]
    fn test_bitmask_follows_fixed_order() {
        let mut filter = CategoryFilter::new();
        assert_eq!(filter.bitmask(), "00000000000");

        filter.add(Category::Health);
        assert_eq!(filter.bitmask(), "01000000000");

        filter.add(Category::Withdrawals);
        assert_eq!(filter.bitmask(), "01000000001");

        filter.remove(Category::Health);
        assert_eq!(filter.bitmask(), "00000000001");
    }

    #[test]
    fn test_fill_all_and_clear() {
        let mut filter = CategoryFilter::new();
        filter.fill_all();
        assert_eq!(filter.bitmask(), "11111111111");
        assert_eq!(filter.len(), Category::ALL.len());

        filter.clear();
        assert_eq!(filter.bitmask(), "00000000000");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = CategoryFilter::new();
        let t = tx(2016, 1, 1, "-10.00", "Health");
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_matches_by_main_category_name() {
        let mut filter = CategoryFilter::new();
        filter.add(Category::Health);

        assert!(filter.matches(&tx(2016, 1, 1, "-10.00", "Health")));
        assert!(!filter.matches(&tx(2016, 1, 1, "-10.00", "Household")));
        // A category name outside the fixed enumeration never matches.
        assert!(!filter.matches(&tx(2016, 1, 1, "-10.00", "Income & credits")));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter = CategoryFilter::new();
        assert!(filter.add(Category::Health));
        assert!(!filter.add(Category::Health));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_active_in_bitmask_order() {
        let mut filter = CategoryFilter::new();
        filter.add(Category::Withdrawals);
        filter.add(Category::CommunicationMedia);
        assert_eq!(
            filter.active(),
            vec![Category::CommunicationMedia, Category::Withdrawals]
        );
    }
}
