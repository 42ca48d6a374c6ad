// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Array expansion: unroll every arrayed entity into one scalar clone per
//! element, and turn the original entity into a sum over its clones.
//!
//! For an entity `stock[loc]` with `loc = [north, south]` and the equation
//! `inflow` (where `inflow` is also indexed by `loc`), expansion appends
//!
//! ```text
//! stock[north] = inflow[north]
//! stock[south] = inflow[south]
//! ```
//!
//! to the model's entities and rewrites the original to
//! `stock = stock[north] + stock[south]`.  Sums over three or more
//! elements nest to the right: `a + (b + (c + d))`.

use tracing::{debug, info, trace};

use crate::ast::Expr;
use crate::common::{ElementName, Result};
use crate::datamodel::{Entity, EquationText, EquationTree, Project};
use crate::dimensions::{DimensionTable, cartesian_product};
use crate::rewrite::{ElementContext, rewrite_identifiers};
use crate::spread::spread_arguments;
use crate::var_err;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpandStats {
    pub models: usize,
    /// Arrayed entities that were unrolled.
    pub expanded: usize,
    /// Scalar clones appended to models.
    pub clones: usize,
}

/// Expand every arrayed entity in the project, returning the (mutated)
/// project.  On error the project is discarded: it may be partially
/// expanded.
pub fn expand_arrays(mut project: Project) -> Result<Project> {
    expand_project(&mut project)?;
    Ok(project)
}

/// Expand every arrayed entity in the project in place.
pub fn expand_project(project: &mut Project) -> Result<ExpandStats> {
    let Project { models, dimensions } = project;
    let dims = DimensionTable::new(dimensions);

    let mut stats = ExpandStats::default();
    for (model_name, model) in models.iter_mut() {
        stats.models += 1;
        for (kind, entities) in model.entities.iter_mut() {
            expand_entities(model_name, kind, entities, &dims, &mut stats)?;
        }
    }

    info!(
        models = stats.models,
        expanded = stats.expanded,
        clones = stats.clones,
        "expanded arrays"
    );
    Ok(stats)
}

/// One element of an arrayed entity, ready to become a clone.
struct Element {
    labels: Vec<ElementName>,
    tree: Expr,
    text: Option<EquationText>,
}

fn expand_entities(
    model: &str,
    kind: &str,
    entities: &mut Vec<Entity>,
    dims: &DimensionTable,
    stats: &mut ExpandStats,
) -> Result<()> {
    // clones are buffered so that only entities present before expansion
    // are visited
    let mut clones: Vec<Entity> = vec![];

    for entity in entities.iter_mut() {
        let location = format!("{model}.{kind}.{}", entity.name);
        let elements = match elements_of(entity, dims).map_err(|err| err.context(&location))? {
            Some(elements) => elements,
            None => continue,
        };

        debug!(
            model,
            kind,
            entity = %entity.name,
            elements = elements.len(),
            "expanding arrayed entity"
        );

        let mut generated = Vec::with_capacity(elements.len());
        for Element {
            labels,
            mut tree,
            text,
        } in elements
        {
            let element = ElementContext {
                model,
                dimensions: entity.dimensions(),
                labels: &labels,
            };
            rewrite_identifiers(&mut tree, &element, dims).map_err(|err| {
                err.context(&format!("{location}[{}]", labels.join(", ")))
            })?;
            trace!("{}[{}] = {tree}", entity.name, labels.join(", "));

            let mut clone = entity.clone();
            clone.labels = Some(labels);
            clone.equation_parsed = EquationTree::Single(tree);
            if text.is_some() {
                clone.equation = text;
            }
            generated.push(clone);
        }

        let sum = fold_elements(&generated).map_err(|err| err.context(&location))?;
        let sum = spread_arguments(sum, model, dims).map_err(|err| err.context(&location))?;
        if let Some(labels) = entity.labels.as_mut() {
            labels.clear();
        }
        entity.equation_parsed = EquationTree::Single(sum);

        stats.expanded += 1;
        stats.clones += generated.len();
        clones.extend(generated);
    }

    entities.extend(clones);
    Ok(())
}

/// Classify an entity: `None` for scalars, which are left untouched, or
/// the elements it unrolls into.
fn elements_of(entity: &Entity, dims: &DimensionTable) -> Result<Option<Vec<Element>>> {
    match &entity.equation_parsed {
        EquationTree::Branches(trees) if trees.len() > 1 => {
            if entity.dimensions().is_empty() {
                return var_err!(
                    MismatchedDimensions,
                    format!("{} element equations but no dimensions", trees.len())
                );
            }
            let axes = dims.labels_of(entity.dimensions())?;
            let product = cartesian_product(&axes);
            if product.len() != trees.len() {
                return var_err!(
                    MismatchedDimensions,
                    format!(
                        "{} element equations for {} elements of [{}]",
                        trees.len(),
                        product.len(),
                        entity.dimensions().join(", ")
                    )
                );
            }

            let texts: Vec<Option<EquationText>> = match &entity.equation {
                Some(EquationText::Elements(texts)) if texts.len() == trees.len() => texts
                    .iter()
                    .map(|text| Some(EquationText::Single(text.clone())))
                    .collect(),
                _ => vec![None; trees.len()],
            };

            let elements = product
                .into_iter()
                .zip(trees.iter().cloned())
                .zip(texts)
                .map(|((labels, tree), text)| Element { labels, tree, text })
                .collect();
            Ok(Some(elements))
        }
        _ if entity.dimensions().is_empty() => Ok(None),
        eqn => {
            let tree = match eqn {
                EquationTree::Single(tree) => tree,
                EquationTree::Branches(trees) => match trees.first() {
                    Some(tree) => tree,
                    None => return var_err!(EmptyEquation, "no equation".to_owned()),
                },
            };

            let axes = dims.labels_of(entity.dimensions())?;
            let product = cartesian_product(&axes);
            if product.is_empty() {
                let empty: Vec<&str> = entity
                    .dimensions()
                    .iter()
                    .zip(axes.iter())
                    .filter(|(_, labels)| labels.is_empty())
                    .map(|(dim, _)| dim.as_str())
                    .collect();
                return var_err!(
                    EmptyDimension,
                    format!("dimension(s) [{}] have no elements", empty.join(", "))
                );
            }

            let elements = product
                .into_iter()
                .map(|labels| Element {
                    labels,
                    tree: tree.clone(),
                    text: None,
                })
                .collect();
            Ok(Some(elements))
        }
    }
}

/// Build the equation of an arrayed entity from its clones: a reference
/// to the only clone, or a right-nested sum `c1 + (c2 + (... + cn))`.
fn fold_elements(elements: &[Entity]) -> Result<Expr> {
    let reference = |entity: &Entity| Expr::element(&entity.name, entity.labels());

    match elements {
        [] => var_err!(EmptyDimension, "no elements to sum".to_owned()),
        [only] => Ok(reference(only)),
        [l, r] => Ok(Expr::add(reference(l), reference(r))),
        [init @ .., l, r] => {
            let mut sum = Expr::add(reference(l), reference(r));
            for entity in init.iter().rev() {
                sum = Expr::add(reference(entity), sum);
            }
            Ok(sum)
        }
    }
}
