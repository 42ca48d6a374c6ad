// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use indexmap::IndexMap;

use crate::common::{DimensionName, ElementName, Result};
use crate::datamodel::Dimension;
use crate::model_err;

/// Read-only view over a project's dimensions, answering the membership
/// questions array expansion asks.
#[derive(Clone, Copy, Debug)]
pub struct DimensionTable<'a> {
    dimensions: &'a IndexMap<DimensionName, Dimension>,
}

impl<'a> DimensionTable<'a> {
    pub fn new(dimensions: &'a IndexMap<DimensionName, Dimension>) -> Self {
        DimensionTable { dimensions }
    }

    pub fn get(&self, name: &str) -> Result<&'a Dimension> {
        match self.dimensions.get(name) {
            Some(dim) => Ok(dim),
            None => model_err!(BadDimensionName, format!("unknown dimension '{name}'")),
        }
    }

    pub fn labels(&self, name: &str) -> Result<&'a [ElementName]> {
        self.get(name).map(|dim| dim.labels.as_slice())
    }

    /// Whether dimension `dim` indexes `name` in `model`.
    pub fn indexes(&self, dim: &str, model: &str, name: &str) -> Result<bool> {
        self.get(dim).map(|dim| dim.indexes(model, name))
    }

    /// Number of dimensions (of all known dimensions) indexing `name`.
    pub fn dimension_count(&self, model: &str, name: &str) -> usize {
        self.dimensions
            .values()
            .filter(|dim| dim.indexes(model, name))
            .count()
    }

    /// The dimensions indexing `name` that have at least one label, in
    /// declaration order.  These are the axes an explicit subscript on
    /// `name` is resolved against.
    pub fn axes_of(&self, model: &str, name: &str) -> Vec<(&'a str, &'a Dimension)> {
        self.dimensions
            .iter()
            .filter(|(_, dim)| !dim.labels.is_empty() && dim.indexes(model, name))
            .map(|(dim_name, dim)| (dim_name.as_str(), dim))
            .collect()
    }

    /// The label lists of each named dimension, in order.
    pub fn labels_of(&self, dims: &[DimensionName]) -> Result<Vec<&'a [ElementName]>> {
        dims.iter().map(|dim| self.labels(dim)).collect()
    }
}

/// Compute the Cartesian product of multiple lists in row-major order
/// (first list varies slowest).
///
/// For example: `[[a, b], [x, y]]` produces `[[a, x], [a, y], [b, x], [b, y]]`.
/// A single axis yields one 1-tuple per element; no axes yields nothing.
pub fn cartesian_product<T: Clone>(axes: &[&[T]]) -> Vec<Vec<T>> {
    if axes.is_empty() {
        return vec![];
    }

    let mut result: Vec<Vec<T>> = axes[0].iter().map(|e| vec![e.clone()]).collect();

    for axis in &axes[1..] {
        let mut new_result = Vec::with_capacity(result.len() * axis.len());
        for prefix in &result {
            for elem in axis.iter() {
                let mut combo = prefix.clone();
                combo.push(elem.clone());
                new_result.push(combo);
            }
        }
        result = new_result;
    }

    result
}
