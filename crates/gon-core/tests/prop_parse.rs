/// Property-based tests for the GON parser.
///
/// Uses `proptest` to check properties that should hold for every input:
///
/// - canonical value rendering reads back as the same value
/// - whitespace and comments between tokens never change the parsed tree
/// - parsing the same text twice yields identical trees
/// - the parser never panics, whatever the input
use gon_core::{parse, parse_forest, parse_value, Object, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

/// A child name. Keywords are fine as names.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,8}"
}

/// String content, including characters that render escaped.
fn arb_string_content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ;:#{}=.\\-\\[\\]\"\\\\]{0,24}"
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        prop::num::f64::NORMAL.prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        arb_string_content().prop_map(Value::String),
        Just(Value::Null),
    ]
}

/// Insignificant text that may sit between tokens.
fn arb_gap() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        Just("\n\t".to_string()),
        "[a-z ]{0,10}".prop_map(|note| format!(" # {note}\n")),
    ]
}

/// Render `name{ child:value; ... }` with `gap` between tokens.
fn render(name: &str, children: &BTreeMap<String, Value>, gaps: &[String]) -> String {
    let mut gap = gaps.iter().cycle();
    let mut next_gap = || gap.next().cloned().unwrap_or_default();

    let mut out = String::new();
    out.push_str(&next_gap());
    out.push_str(name);
    out.push_str(&next_gap());
    out.push('{');
    for (child, value) in children {
        out.push_str(&next_gap());
        out.push_str(child);
        out.push_str(&next_gap());
        out.push(':');
        out.push_str(&next_gap());
        out.push(' ');
        out.push_str(&value.to_string());
        out.push_str(&next_gap());
        out.push(';');
    }
    out.push_str(&next_gap());
    out.push('}');
    out.push_str(&next_gap());
    out
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rendered_value_reads_back(value in arb_value()) {
        let text = value.to_string();
        let parsed = parse_value(&text).unwrap();
        prop_assert_eq!(parsed, value, "rendered as {}", text);
    }

    #[test]
    fn integers_in_any_radix(n in any::<i64>()) {
        let magnitude = n.unsigned_abs();
        let sign = if n < 0 { "-" } else { "" };
        for text in [
            format!("{sign}{magnitude}"),
            format!("{sign}0x{magnitude:X}"),
            format!("{sign}#{magnitude:x}"),
            format!("{sign}0b{magnitude:b}"),
            format!("{sign}0{magnitude:o}"),
        ] {
            prop_assert_eq!(parse_value(&text).unwrap(), Value::Int(n), "text {}", text);
        }
    }

    #[test]
    fn gaps_do_not_change_the_tree(
        name in arb_name(),
        children in prop::collection::btree_map(arb_name(), arb_value(), 0..6),
        gaps in prop::collection::vec(arb_gap(), 1..8),
    ) {
        let tight = render(&name, &children, &[String::new()]);
        let loose = render(&name, &children, &gaps);
        prop_assert_eq!(parse(&tight).unwrap(), parse(&loose).unwrap(), "loose text {:?}", loose);
    }

    #[test]
    fn rendered_children_are_recovered(
        children in prop::collection::btree_map(arb_name(), arb_value(), 0..6),
    ) {
        let root = parse(&render("root", &children, &[" ".to_string()])).unwrap();
        prop_assert_eq!(root.children().len(), children.len());
        for (name, value) in &children {
            let child = root.as_nested().and_then(|n| n.get(name)).unwrap();
            prop_assert_eq!(child.value(), Some(value));
        }
    }

    #[test]
    fn parsing_is_deterministic(
        children in prop::collection::btree_map(arb_name(), arb_value(), 0..6),
    ) {
        let text = render("root", &children, &["\n".to_string()]);
        let first: Object = parse(&text).unwrap();
        let second: Object = parse(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,64}") {
        let _ = parse(&text);
        let _ = parse_forest(&text);
        let _ = parse_value(&text);
    }
}
