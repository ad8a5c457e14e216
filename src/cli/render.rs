//! Table and tree views of an aggregated budget.

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::config::Settings;
use crate::domain::{AggregatedItem, AggregatedTree};

const GRAND_TOTAL: &str = "Grand Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub precision: usize,
    pub indent: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            indent: 2,
            color: false,
        }
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            precision: settings.precision,
            indent: settings.indent,
            color: settings.color,
        }
    }
}

/// Fixed-precision number. Non-finite values print as `NaN` / `inf`.
/// Negative zero prints as zero.
pub fn format_amount(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value + 0.0)
}

pub fn format_variance(variance: f64, precision: usize) -> String {
    format!("{}%", format_amount(variance, precision))
}

struct Row {
    label: String,
    value: String,
    variance: String,
    raw_variance: Option<f64>,
}

/// Render the aggregated forest as a table with a grand total row.
pub fn render_table(view: &AggregatedTree, opts: &RenderOptions) -> String {
    let mut rows: Vec<Row> = view
        .iter()
        .map(|(depth, item)| Row {
            label: indented_label(depth, item, opts.indent),
            value: format_amount(item.value, opts.precision),
            variance: format_variance(item.variance, opts.precision),
            raw_variance: Some(item.variance),
        })
        .collect();
    rows.push(Row {
        label: GRAND_TOTAL.to_string(),
        value: format_amount(view.grand_total(), opts.precision),
        variance: "—".to_string(),
        raw_variance: None,
    });

    let label_w = column_width("Label", rows.iter().map(|r| r.label.as_str()));
    let value_w = column_width("Value", rows.iter().map(|r| r.value.as_str()));
    let variance_w = column_width("Variance %", rows.iter().map(|r| r.variance.as_str()));

    let header = format!(
        "{:<label_w$}  {:>value_w$}  {:>variance_w$}",
        "Label", "Value", "Variance %"
    );
    let rule = "-".repeat(label_w + value_w + variance_w + 4);

    let body = rows.iter().map(|row| {
        let variance = format!("{:>variance_w$}", row.variance);
        let variance = match row.raw_variance {
            Some(v) if opts.color => colorize_variance(&variance, v),
            _ => variance,
        };
        format!("{:<label_w$}  {:>value_w$}  {}", row.label, row.value, variance)
    });

    std::iter::once(header)
        .chain(std::iter::once(rule))
        .chain(body)
        .join("\n")
}

/// Render the aggregated forest as a tree rooted at the grand total.
pub fn render_tree(view: &AggregatedTree, precision: usize) -> Tree<String> {
    let root = format!("{} {}", GRAND_TOTAL, format_amount(view.grand_total(), precision));
    let leaves = view
        .rows()
        .iter()
        .map(|item| item_tree(item, precision))
        .collect::<Vec<_>>();
    Tree::new(root).with_leaves(leaves)
}

fn item_tree(item: &AggregatedItem, precision: usize) -> Tree<String> {
    let node = format!(
        "{} [{}] {} ({})",
        item.label,
        item.id,
        format_amount(item.value, precision),
        format_variance(item.variance, precision)
    );
    let leaves = item
        .children
        .iter()
        .map(|child| item_tree(child, precision))
        .collect::<Vec<_>>();
    Tree::new(node).with_leaves(leaves)
}

fn indented_label(depth: usize, item: &AggregatedItem, indent: usize) -> String {
    if depth == 0 {
        item.label.clone()
    } else {
        format!("{}-- {}", " ".repeat(depth * indent), item.label)
    }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

fn colorize_variance(cell: &str, variance: f64) -> String {
    if variance > 0.0 {
        cell.green().to_string()
    } else if variance < 0.0 {
        cell.red().to_string()
    } else if variance.is_nan() {
        cell.yellow().to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{aggregate, Tree as BudgetTree};

    #[test]
    fn given_sample_tree_when_rendering_table_then_shows_rows_and_total() {
        let view = aggregate(&BudgetTree::sample());
        let table = render_table(&view, &RenderOptions::default());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("Label"));
        assert!(lines[2].starts_with("Electronics"));
        assert!(lines[2].contains("1500.00"));
        assert!(lines[3].starts_with("  -- Phones"));
        assert!(lines[3].trim_end().ends_with("0.00%"));
        let total = lines.last().unwrap();
        assert!(total.starts_with("Grand Total"));
        assert!(total.contains("2500.00"));
    }

    #[test]
    fn given_non_finite_values_when_formatting_then_prints_verbatim() {
        assert_eq!(format_variance(f64::NAN, 2), "NaN%");
        assert_eq!(format_variance(f64::INFINITY, 2), "inf%");
        assert_eq!(format_amount(2650.0000000000005, 2), "2650.00");
    }

    #[test]
    fn given_zero_leaf_cut_by_200_percent_when_rendering_then_prints_unsigned_zero() {
        use crate::domain::{apply_percent, LineItem};

        let tree = BudgetTree::new(vec![
            LineItem::leaf("spare", "Spare", 0.0),
            LineItem::leaf("rent", "Rent", 100.0),
        ])
        .unwrap();
        let edited = apply_percent(&tree, "spare", "-200");
        let view = aggregate(&edited);
        let spare = view.find("spare").unwrap();

        assert!(spare.value.is_sign_negative());
        assert_eq!(format_amount(spare.value, 2), "0.00");
        assert!(!render_table(&view, &RenderOptions::default()).contains("-0.00"));
    }

    #[test]
    fn given_sample_tree_when_rendering_tree_then_nests_children() {
        let view = aggregate(&BudgetTree::sample());
        let rendered = render_tree(&view, 1).to_string();

        assert!(rendered.starts_with("Grand Total 2500.0"));
        assert!(rendered.contains("Electronics [electronics] 1500.0 (0.0%)"));
        assert!(rendered.contains("Chairs [chairs] 700.0 (0.0%)"));
    }
}
