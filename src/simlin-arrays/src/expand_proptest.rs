// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for array expansion using proptest.
//!
//! These tests verify that:
//! 1. Expansion produces one clone per element, in row-major order
//! 2. The original's sum references every clone, nested to the right
//! 3. Range subscripts resolve between the last occurrences of their bounds

use proptest::prelude::*;

use crate::ast::Expr;
use crate::datamodel::EquationTree;
use crate::dimensions::cartesian_product;
use crate::subscript::{Resolved, resolve};
use crate::testutils::TestProject;

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-e]".prop_map(|s| s.to_string())
}

fn labels_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(label_strategy(), 0..8)
}

/// Distinct labels for up to three dimensions, each with 1-4 elements.
fn dimensions_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(1usize..5, 1..4).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(d, n)| (0..n).map(|i| format!("d{d}e{i}")).collect())
            .collect()
    })
}

/// The index of the last label equal to `name`, found by a forward scan.
fn last_index_of(labels: &[String], name: &str) -> usize {
    let mut last = None;
    for (i, label) in labels.iter().enumerate() {
        if label == name {
            last = Some(i);
        }
    }
    last.expect("bound drawn from labels")
}

/// Flatten a right-nested sum into the element references it adds up.
fn summands(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Operator { name, args } if name == "+" && args.len() == 2 => {
            assert!(
                !matches!(args[0], Expr::Operator { .. }),
                "sum should nest to the right"
            );
            let mut terms = vec![args[0].clone()];
            terms.extend(summands(&args[1]));
            terms
        }
        other => vec![other.clone()],
    }
}

proptest! {
    #[test]
    fn expansion_matches_cartesian_product(dims in dimensions_strategy()) {
        let names: Vec<String> = (0..dims.len()).map(|d| format!("dim{d}")).collect();
        let name_refs: Vec<&str> = names.iter().map(|n| n.as_str()).collect();

        let mut builder = TestProject::new("main");
        for (name, labels) in names.iter().zip(dims.iter()) {
            let labels: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
            builder = builder.dimension(name, &labels);
        }
        let project = builder
            .indexed_by("rate", &name_refs)
            .arrayed("stocks", "stock", &name_refs, Expr::ident("rate"))
            .expand();

        let axes: Vec<&[String]> = dims.iter().map(|d| d.as_slice()).collect();
        let product = cartesian_product(&axes);

        let entities = &project.models["main"].entities["stocks"];
        prop_assert_eq!(product.len() + 1, entities.len());

        let original = &entities[0];
        prop_assert!(original.labels().is_empty());

        for (clone, labels) in entities[1..].iter().zip(product.iter()) {
            prop_assert_eq!(clone.labels(), labels.as_slice());
            prop_assert_eq!(
                &clone.equation_parsed,
                &EquationTree::Single(Expr::element("rate", labels))
            );
        }

        let expected: Vec<Expr> = product
            .iter()
            .map(|labels| Expr::element("stock", labels))
            .collect();
        let sum = original.equation().unwrap();
        prop_assert_eq!(expected, summands(sum));
    }

    #[test]
    fn wildcard_resolves_to_all_labels(labels in labels_strategy()) {
        prop_assert_eq!(
            Resolved::Labels(labels.clone()),
            resolve(&Expr::Asterisk, &labels).unwrap()
        );
    }

    #[test]
    fn range_resolves_between_last_occurrences(
        labels in prop::collection::vec(label_strategy(), 1..8),
        start in 0usize..8,
        end in 0usize..8,
    ) {
        let start = &labels[start % labels.len()];
        let end = &labels[end % labels.len()];

        let start_off = last_index_of(&labels, start);
        let end_off = last_index_of(&labels, end);
        let expected: Vec<String> = labels
            .iter()
            .enumerate()
            .filter(|(i, _)| start_off <= *i && *i <= end_off)
            .map(|(_, label)| label.clone())
            .collect();

        prop_assert_eq!(
            Resolved::Labels(expected),
            resolve(&Expr::range(start, end), &labels).unwrap()
        );
    }

    #[test]
    fn range_bounds_skip_earlier_duplicates(
        prefix in prop::collection::vec("[x-z]", 0..4),
        middle in prop::collection::vec("[x-z]", 0..4),
    ) {
        // "a" and "b" each appear once in the prefix and again later; the
        // range spans from the second "a" to the second "b"
        let mut labels: Vec<String> = vec!["a".to_owned(), "b".to_owned()];
        labels.extend(prefix);
        let start = labels.len();
        labels.push("a".to_owned());
        labels.extend(middle);
        labels.push("b".to_owned());

        prop_assert_eq!(
            Resolved::Labels(labels[start..].to_vec()),
            resolve(&Expr::range("a", "b"), &labels).unwrap()
        );
    }
}
