//! Tests for percentage and absolute edits

use rstest::rstest;

use budgetree::domain::{aggregate, apply, apply_percent, apply_value, EditMode, LineItem, Tree};
use budgetree::util::testing::{assert_close, init_test_setup, three_level_tree};

#[ctor::ctor]
fn init() {
    init_test_setup();
}

fn parent_with_children(values: &[f64]) -> Tree {
    let children = values
        .iter()
        .enumerate()
        .map(|(i, v)| LineItem::leaf(format!("c{i}"), format!("Child {i}"), *v))
        .collect();
    let total = values.iter().sum();
    Tree::new(vec![LineItem::group("parent", "Parent", total, children)]).unwrap()
}

// ============================================================
// Percentage mode
// ============================================================

#[test]
fn given_leaf_800_when_applying_10_percent_then_value_is_880() {
    let tree = Tree::sample();

    let edited = apply_percent(&tree, "phones", "10");

    assert_close(edited.find("phones").unwrap().value(), 880.0);
    assert_eq!(edited.find("phones").unwrap().original_value(), 800.0);
}

#[test]
fn given_internal_target_when_applying_percent_then_children_scale_and_parent_is_their_sum() {
    let tree = Tree::sample();

    let edited = apply_percent(&tree, "electronics", "10");

    let electronics = edited.find("electronics").unwrap();
    assert_close(electronics.children()[0].value(), 880.0);
    assert_close(electronics.children()[1].value(), 770.0);
    assert_close(electronics.value(), 1650.0);
}

#[rstest]
#[case("electronics", "10", 2650.0)]
#[case("electronics", "-100", 1000.0)]
#[case("furniture", "50", 3000.0)]
#[case("chairs", "-10", 2430.0)]
#[case("phones", "0", 2500.0)]
fn given_sample_tree_when_applying_percent_then_grand_total_matches(
    #[case] id: &str,
    #[case] input: &str,
    #[case] expected_total: f64,
) {
    let edited = apply_percent(&Tree::sample(), id, input);
    assert_close(aggregate(&edited).grand_total(), expected_total);
}

#[test]
fn given_grandchildren_when_applying_percent_at_top_then_only_immediate_children_are_scaled() {
    let tree = three_level_tree();

    let edited = apply_percent(&tree, "company", "10");

    // ops is internal: its stored value is scaled, but its leaves are not
    assert_close(edited.find("ops").unwrap().value(), 440.0);
    assert_eq!(edited.find("rent").unwrap().value(), 300.0);
    assert_close(edited.find("payroll").unwrap().value(), 660.0);

    // aggregation re-derives ops from its untouched leaves
    let view = aggregate(&edited);
    assert_eq!(view.find("ops").unwrap().value, 400.0);
    assert_close(view.find("company").unwrap().value, 1060.0);
}

// ============================================================
// Absolute-value mode
// ============================================================

#[test]
fn given_children_800_700_when_setting_parent_to_3000_then_children_double() {
    let tree = parent_with_children(&[800.0, 700.0]);

    let edited = apply_value(&tree, "parent", "3000");

    let parent = edited.find("parent").unwrap();
    assert_eq!(parent.value(), 3000.0);
    assert_eq!(parent.children()[0].value(), 1600.0);
    assert_eq!(parent.children()[1].value(), 1400.0);
}

#[test]
fn given_zero_children_when_setting_parent_then_ratio_falls_back_to_one() {
    let tree = parent_with_children(&[0.0, 0.0]);

    let edited = apply_value(&tree, "parent", "500");

    let parent = edited.find("parent").unwrap();
    assert_eq!(parent.value(), 500.0);
    assert_eq!(parent.children()[0].value(), 0.0);
    assert_eq!(parent.children()[1].value(), 0.0);
    // the next read reconciles the parent with its children
    assert_eq!(aggregate(&edited).find("parent").unwrap().value, 0.0);
}

#[test]
fn given_leaf_when_setting_value_then_value_is_replaced_unconditionally() {
    let edited = apply_value(&Tree::sample(), "tables", "-42.5");
    assert_eq!(edited.find("tables").unwrap().value(), -42.5);
}

#[test]
fn given_awkward_ratio_when_setting_parent_then_parent_keeps_exact_target() {
    let tree = parent_with_children(&[1.0, 1.0, 1.0]);

    let edited = apply_value(&tree, "parent", "10");

    assert_eq!(edited.find("parent").unwrap().value(), 10.0);
    let view = aggregate(&edited);
    assert_close(view.find("parent").unwrap().value, 10.0);
}

// ============================================================
// No-op cases
// ============================================================

#[rstest]
#[case("abc")]
#[case("")]
#[case("  ")]
#[case("10%")]
#[case("NaN")]
fn given_invalid_input_when_applying_percent_then_tree_is_unchanged(#[case] input: &str) {
    let tree = Tree::sample();
    assert_eq!(apply_percent(&tree, "electronics", input), tree);
}

#[rstest]
#[case(EditMode::Percent)]
#[case(EditMode::Value)]
fn given_unknown_id_when_applying_then_tree_is_unchanged(#[case] mode: EditMode) {
    let tree = Tree::sample();
    assert_eq!(apply(&tree, "nonexistent", mode, "100"), tree);
}

#[test]
fn given_edit_when_applied_then_input_tree_is_not_mutated() {
    let tree = Tree::sample();
    let before = tree.clone();

    let _ = apply_value(&tree, "electronics", "9000");
    let _ = apply_percent(&tree, "furniture", "25");

    assert_eq!(tree, before);
}

#[test]
fn given_sequence_of_edits_when_applied_then_baselines_never_change() {
    let tree = three_level_tree();
    let baselines: Vec<(String, f64)> = tree
        .iter()
        .map(|(_, item)| (item.id().to_string(), item.original_value()))
        .collect();

    let edits = [
        ("company", EditMode::Percent, "12.5"),
        ("ops", EditMode::Value, "1000"),
        ("rent", EditMode::Percent, "-30"),
        ("company", EditMode::Value, "0"),
        ("payroll", EditMode::Value, "17"),
    ];
    let edited = edits
        .iter()
        .fold(tree, |acc, (id, mode, input)| apply(&acc, id, *mode, input));

    for (id, baseline) in baselines {
        assert_eq!(edited.find(&id).unwrap().original_value(), baseline, "baseline of {id}");
    }
}
