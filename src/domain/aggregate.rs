//! Bottom-up aggregation of effective values and variance.

use tracing::instrument;

use crate::domain::{ItemId, LineItem, Tree};

/// Percentage drift of `value` from `original_value`.
///
/// A zero baseline yields a non-finite result (NaN for 0/0, +/-inf otherwise).
/// It is returned as-is for the caller to display.
pub fn variance(value: f64, original_value: f64) -> f64 {
    (value - original_value) / original_value * 100.0
}

/// A line item with its derived effective value and variance.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub id: ItemId,
    pub label: String,
    /// Effective value: stored value for a leaf, sum of children otherwise
    pub value: f64,
    pub original_value: f64,
    pub variance: f64,
    pub children: Vec<AggregatedItem>,
}

impl AggregatedItem {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Tree parallel to a [`Tree`] with every derived field filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTree {
    rows: Vec<AggregatedItem>,
}

impl AggregatedTree {
    pub fn rows(&self) -> &[AggregatedItem] {
        &self.rows
    }

    /// Sum of the top-level effective values.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|row| row.value).sum()
    }

    pub fn find(&self, id: &str) -> Option<&AggregatedItem> {
        self.iter().map(|(_, item)| item).find(|item| item.id.as_str() == id)
    }

    /// Pre-order traversal yielding `(depth, item)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AggregatedItem)> {
        let mut stack: Vec<(usize, &AggregatedItem)> =
            self.rows.iter().rev().map(|item| (0, item)).collect();
        std::iter::from_fn(move || {
            let (depth, item) = stack.pop()?;
            stack.extend(item.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, item))
        })
    }
}

/// Recompute effective values and variances for the whole forest.
///
/// Pure: the input is not touched and equal inputs give equal outputs.
#[instrument(level = "trace", skip(tree))]
pub fn aggregate(tree: &Tree) -> AggregatedTree {
    AggregatedTree {
        rows: tree.rows().iter().map(aggregate_item).collect(),
    }
}

fn aggregate_item(item: &LineItem) -> AggregatedItem {
    let children: Vec<AggregatedItem> = item.children().iter().map(aggregate_item).collect();
    let value = if item.is_leaf() {
        item.value()
    } else {
        children.iter().map(|child| child.value).sum()
    };

    AggregatedItem {
        id: item.id().clone(),
        label: item.label().to_string(),
        value,
        original_value: item.original_value(),
        // Internal items compare against their own baseline, not the
        // children's baselines
        variance: variance(value, item.original_value()),
        children,
    }
}
