//! Top-down edits: percentage scaling and absolute targets.
//!
//! Both edits locate the target by id, change it and its immediate children,
//! and return a new tree. The input tree is never mutated, so snapshots taken
//! before an edit stay valid.
//!
//! The returned tree is not display-ready: internal values are placeholders
//! until the next [`aggregate`](crate::domain::aggregate) pass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{LineItem, Tree};

/// The two edit buttons of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Scale by `1 + input / 100`
    Percent,
    /// Set to an absolute target
    Value,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Percent => f.write_str("pct"),
            EditMode::Value => f.write_str("val"),
        }
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pct" | "%" | "percent" => Ok(EditMode::Percent),
            "val" | "value" => Ok(EditMode::Value),
            other => Err(format!("unknown edit mode: {other}")),
        }
    }
}

/// Parse raw edit text into a number.
///
/// Surrounding whitespace is ignored. Empty text, unparsable text and NaN or
/// infinite values are invalid and yield `None`.
pub fn parse_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Scale the target's total by `1 + pct / 100`.
///
/// A leaf is scaled directly. An internal item has each immediate child
/// scaled and takes the sum of the scaled children as its own value.
/// Invalid input or an unknown id returns the tree unchanged.
#[instrument(level = "debug", skip(tree))]
pub fn apply_percent(tree: &Tree, target: &str, raw: &str) -> Tree {
    let Some(pct) = parse_input(raw) else {
        debug!("apply_percent: invalid input {raw:?}, tree unchanged");
        return tree.clone();
    };
    let factor = 1.0 + pct / 100.0;
    rewrite(tree, target, |item| scale_item(item, factor))
}

/// Set the target's total to `val`.
///
/// A leaf takes `val` directly. An internal item rescales its immediate
/// children by `val / sum(children)`, or by 1 when that sum is zero, and
/// stores `val` exactly as its own value.
/// Invalid input or an unknown id returns the tree unchanged.
#[instrument(level = "debug", skip(tree))]
pub fn apply_value(tree: &Tree, target: &str, raw: &str) -> Tree {
    let Some(val) = parse_input(raw) else {
        debug!("apply_value: invalid input {raw:?}, tree unchanged");
        return tree.clone();
    };
    rewrite(tree, target, |item| retarget_item(item, val))
}

/// Dispatch on [`EditMode`].
pub fn apply(tree: &Tree, target: &str, mode: EditMode, raw: &str) -> Tree {
    match mode {
        EditMode::Percent => apply_percent(tree, target, raw),
        EditMode::Value => apply_value(tree, target, raw),
    }
}

fn scale_item(item: &LineItem, factor: f64) -> LineItem {
    if item.is_leaf() {
        return item.with_value(item.value() * factor);
    }
    let children: Vec<LineItem> = item
        .children()
        .iter()
        .map(|child| child.with_value(child.value() * factor))
        .collect();
    let total = children.iter().map(LineItem::value).sum();
    item.with_children(total, children)
}

fn retarget_item(item: &LineItem, val: f64) -> LineItem {
    if item.is_leaf() {
        return item.with_value(val);
    }
    let total: f64 = item.children().iter().map(LineItem::value).sum();
    // NaN counts as "nothing to scale from" as well
    let ratio = if total != 0.0 && !total.is_nan() {
        val / total
    } else {
        1.0
    };
    let children = item
        .children()
        .iter()
        .map(|child| child.with_value(child.value() * ratio))
        .collect();
    item.with_children(val, children)
}

fn rewrite(tree: &Tree, target: &str, edit: impl Fn(&LineItem) -> LineItem) -> Tree {
    match rewrite_rows(tree.rows(), target, &edit) {
        Some(rows) => Tree::from_validated(rows),
        None => {
            debug!("no line item with id {target:?}, tree unchanged");
            tree.clone()
        }
    }
}

/// Rebuild `rows` with the target edited, or `None` if it is not below them.
fn rewrite_rows(
    rows: &[LineItem],
    target: &str,
    edit: &dyn Fn(&LineItem) -> LineItem,
) -> Option<Vec<LineItem>> {
    rows.iter().enumerate().find_map(|(pos, item)| {
        let replacement = if item.id().as_str() == target {
            edit(item)
        } else {
            let children = rewrite_rows(item.children(), target, edit)?;
            item.with_children(item.value(), children)
        };
        let rebuilt = rows[..pos]
            .iter()
            .cloned()
            .chain(std::iter::once(replacement))
            .chain(rows[pos + 1..].iter().cloned())
            .collect();
        Some(rebuilt)
    })
}
