// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The intermediate representation consumed and produced by array
//! expansion.
//!
//! The JSON shape is:
//!
//! ```json
//! {
//!   "models": {"main": {"name": "main", "entities": {"stocks": [...]}}},
//!   "dimensions": {"loc": {"labels": ["north", "south"],
//!                          "variables": [{"model": "main", "name": "stock1"}]}}
//! }
//! ```
//!
//! Maps keep insertion order: the order of models, entity kinds,
//! entities and dimension labels all determine the output.  Optional
//! fields round-trip as given: a field that was absent stays absent and
//! an explicit empty list stays an empty list.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::Expr;
use crate::common::{DimensionName, ElementName, Ident, ModelName, Result};

/// A (model, variable) pair registered as indexed by a dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableRef {
    pub model: ModelName,
    pub name: Ident,
}

impl VariableRef {
    pub fn new(model: &str, name: &str) -> Self {
        VariableRef {
            model: model.to_owned(),
            name: name.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub labels: Vec<ElementName>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variables: Option<Vec<VariableRef>>,
}

impl Dimension {
    pub fn variables(&self) -> &[VariableRef] {
        self.variables.as_deref().unwrap_or_default()
    }

    /// Whether `name` in `model` is registered as indexed by this dimension.
    pub fn indexes(&self, model: &str, name: &str) -> bool {
        self.variables()
            .iter()
            .any(|var| var.model == model && var.name == name)
    }
}

/// The parsed equation of an entity: either a single tree, or (as some
/// sources deliver it) one tree per element, aligned with the Cartesian
/// product of the entity's dimension labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquationTree {
    Branches(Vec<Expr>),
    Single(Expr),
}

/// The source text of an equation, carried along for diagnostics only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquationText {
    Elements(Vec<String>),
    Single(String),
}

/// The compound identity of an entity.  Clones of an arrayed entity share
/// its name and differ only in their labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub name: Ident,
    pub labels: Vec<ElementName>,
}

impl EntityKey {
    pub fn new(name: &str, labels: &[&str]) -> Self {
        EntityKey {
            name: name.to_owned(),
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.labels.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}[{}]", self.name, self.labels.join(", "))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: Ident,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dimensions: Option<Vec<DimensionName>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub labels: Option<Vec<ElementName>>,
    pub equation_parsed: EquationTree,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub equation: Option<EquationText>,
    /// Upstream fields (units, documentation, ...) this pass doesn't
    /// interpret but must preserve.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entity {
    pub fn new(name: &str, equation_parsed: Expr) -> Self {
        Entity {
            name: name.to_owned(),
            dimensions: None,
            labels: None,
            equation_parsed: EquationTree::Single(equation_parsed),
            equation: None,
            extra: Default::default(),
        }
    }

    /// The dimensions this entity is arrayed over; empty for scalars.
    pub fn dimensions(&self) -> &[DimensionName] {
        self.dimensions.as_deref().unwrap_or_default()
    }

    /// The element a clone stands for; empty for everything else.
    pub fn labels(&self) -> &[ElementName] {
        self.labels.as_deref().unwrap_or_default()
    }

    pub fn key(&self) -> EntityKey {
        EntityKey {
            name: self.name.clone(),
            labels: self.labels().to_vec(),
        }
    }

    /// The single equation tree, if this entity has exactly one.
    pub fn equation(&self) -> Option<&Expr> {
        match &self.equation_parsed {
            EquationTree::Single(expr) => Some(expr),
            EquationTree::Branches(exprs) if exprs.len() == 1 => exprs.first(),
            EquationTree::Branches(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<ModelName>,
    #[serde(default)]
    pub entities: IndexMap<String, Vec<Entity>>,
}

impl Model {
    /// Look up an entity of the given kind by its compound key.
    pub fn entity(&self, kind: &str, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(kind)?.iter().find(|entity| {
            entity.name == key.name && entity.labels() == key.labels.as_slice()
        })
    }

    /// All entities of a kind sharing `name`: an arrayed original
    /// followed by its clones once expanded.
    pub fn entities_named<'a>(
        &'a self,
        kind: &str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .get(kind)
            .into_iter()
            .flat_map(|entities| entities.iter())
            .filter(move |entity| entity.name == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub models: IndexMap<ModelName, Model>,
    #[serde(default)]
    pub dimensions: IndexMap<DimensionName, Dimension>,
}

impl Project {
    pub fn from_json(contents: &str) -> Result<Project> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
