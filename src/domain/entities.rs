//! Domain entities: line items and the tree that owns them

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Stable identifier of a line item, unique across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One node of the budget tree: a category or a sub-item.
///
/// `original_value` is the baseline captured at construction. Nothing in this
/// crate can change it after the item exists; edits only ever produce copies
/// with a different `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LineItemDoc", into = "LineItemDoc")]
pub struct LineItem {
    id: ItemId,
    label: String,
    value: f64,
    original_value: f64,
    children: Vec<LineItem>,
}

impl LineItem {
    /// Leaf item whose baseline equals its starting value.
    pub fn leaf(id: impl Into<ItemId>, label: impl Into<String>, value: f64) -> Self {
        Self::with_baseline(id, label, value, value, Vec::new())
    }

    /// Internal item whose baseline equals its starting value.
    ///
    /// `value` is stored as given; it is replaced by the children's sum on the
    /// next aggregation pass.
    pub fn group(
        id: impl Into<ItemId>,
        label: impl Into<String>,
        value: f64,
        children: Vec<LineItem>,
    ) -> Self {
        Self::with_baseline(id, label, value, value, children)
    }

    /// Item with an independently chosen baseline.
    pub fn with_baseline(
        id: impl Into<ItemId>,
        label: impl Into<String>,
        value: f64,
        original_value: f64,
        children: Vec<LineItem>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value,
            children,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stored value. Authoritative for leaves, a placeholder for internal items.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn original_value(&self) -> f64 {
        self.original_value
    }

    pub fn children(&self) -> &[LineItem] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this item carrying a new stored value.
    pub(crate) fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// Copy of this item with replaced children and stored value.
    pub(crate) fn with_children(&self, value: f64, children: Vec<LineItem>) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            value,
            original_value: self.original_value,
            children,
        }
    }
}

/// Serialized shape of a line item. A missing `originalValue` means the
/// baseline equals the starting value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemDoc {
    id: ItemId,
    label: String,
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<LineItem>,
}

impl From<LineItemDoc> for LineItem {
    fn from(doc: LineItemDoc) -> Self {
        let original_value = doc.original_value.unwrap_or(doc.value);
        Self::with_baseline(doc.id, doc.label, doc.value, original_value, doc.children)
    }
}

impl From<LineItem> for LineItemDoc {
    fn from(item: LineItem) -> Self {
        Self {
            id: item.id,
            label: item.label,
            value: item.value,
            original_value: Some(item.original_value),
            children: item.children,
        }
    }
}

/// Ordered forest of top-level line items.
///
/// Every `Tree` has passed structural validation: ids are non-empty and
/// unique at every depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeDoc", into = "TreeDoc")]
pub struct Tree {
    rows: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeDoc {
    rows: Vec<LineItem>,
}

impl TryFrom<TreeDoc> for Tree {
    type Error = DomainError;

    fn try_from(doc: TreeDoc) -> Result<Self, Self::Error> {
        Tree::new(doc.rows)
    }
}

impl From<Tree> for TreeDoc {
    fn from(tree: Tree) -> Self {
        Self { rows: tree.rows }
    }
}

impl Tree {
    pub fn new(rows: Vec<LineItem>) -> Result<Self, DomainError> {
        validate(&rows)?;
        Ok(Self { rows })
    }

    /// Rebuild from rows that keep the structure of an already validated tree.
    pub(crate) fn from_validated(rows: Vec<LineItem>) -> Self {
        Self { rows }
    }

    /// The two-category demo forest.
    pub fn sample() -> Self {
        Self::from_validated(vec![
            LineItem::group(
                "electronics",
                "Electronics",
                1500.0,
                vec![
                    LineItem::leaf("phones", "Phones", 800.0),
                    LineItem::leaf("laptops", "Laptops", 700.0),
                ],
            ),
            LineItem::group(
                "furniture",
                "Furniture",
                1000.0,
                vec![
                    LineItem::leaf("tables", "Tables", 300.0),
                    LineItem::leaf("chairs", "Chairs", 700.0),
                ],
            ),
        ])
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn find(&self, id: &str) -> Option<&LineItem> {
        self.iter().map(|(_, item)| item).find(|item| item.id.as_str() == id)
    }

    /// Pre-order traversal yielding `(depth, item)`, top level at depth 0.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter::new(&self.rows)
    }

    /// Number of line items at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn validate(rows: &[LineItem]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&LineItem> = rows.iter().collect();
    while let Some(item) = stack.pop() {
        if item.id.as_str().trim().is_empty() {
            return Err(DomainError::EmptyId {
                label: item.label.clone(),
            });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(DomainError::DuplicateId(item.id.clone()));
        }
        stack.extend(item.children.iter());
    }
    Ok(())
}

pub struct TreeIter<'a> {
    stack: Vec<(usize, &'a LineItem)>,
}

impl<'a> TreeIter<'a> {
    fn new(rows: &'a [LineItem]) -> Self {
        // Reverse so the first row is popped first
        let stack = rows.iter().rev().map(|item| (0, item)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (usize, &'a LineItem);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, item) = self.stack.pop()?;
        for child in item.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, item))
    }
}
