//! Ordered category hierarchy
//!
//! Groups vendor amounts as section → item → vendor lines. Iteration always
//! follows first-insertion order at every level: a section (or item) keeps the
//! position at which it was first seen, and later inserts append to it. The
//! render order of the appendix is taken directly from this order, so it never
//! depends on hashing.

use serde::Serialize;

use super::money::Money;

/// Section used for categorized records that carry no section label
pub const CUSTOM_SECTION: &str = "Custom";

/// One vendor line under an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorEntry {
    pub vendor: String,
    pub amount: Money,
}

/// An item (subcategory) with its vendor lines in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryItem {
    pub name: String,
    pub entries: Vec<VendorEntry>,
}

impl CategoryItem {
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// A section with its items in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySection {
    pub name: String,
    pub items: Vec<CategoryItem>,
}

impl CategorySection {
    pub fn total(&self) -> Money {
        self.items.iter().map(CategoryItem::total).sum()
    }

    /// Look up an item by name
    pub fn item(&self, name: &str) -> Option<&CategoryItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// Insertion-ordered section → item → vendor lines mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTree {
    sections: Vec<CategorySection>,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vendor line under (section, item), creating either on first use
    pub fn insert(&mut self, section: &str, item: &str, vendor: &str, amount: Money) {
        let section_idx = match self.sections.iter().position(|s| s.name == section) {
            Some(idx) => idx,
            None => {
                self.sections.push(CategorySection {
                    name: section.to_string(),
                    items: Vec::new(),
                });
                self.sections.len() - 1
            }
        };

        let items = &mut self.sections[section_idx].items;
        let item_idx = match items.iter().position(|i| i.name == item) {
            Some(idx) => idx,
            None => {
                items.push(CategoryItem {
                    name: item.to_string(),
                    entries: Vec::new(),
                });
                items.len() - 1
            }
        };

        items[item_idx].entries.push(VendorEntry {
            vendor: vendor.to_string(),
            amount,
        });
    }

    /// Sections in first-insertion order
    pub fn sections(&self) -> &[CategorySection] {
        &self.sections
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&CategorySection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section names in render order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Sum over every vendor line in the tree
    pub fn total(&self) -> Money {
        self.sections.iter().map(CategorySection::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of vendor lines across all sections
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .map(|i| i.entries.len())
            .sum()
    }
}
