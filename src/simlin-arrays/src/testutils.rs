// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Builder for small projects used across unit tests.

use crate::ast::Expr;
use crate::common::Result;
use crate::datamodel::{Dimension, Entity, EntityKey, EquationTree, Project, VariableRef};
use crate::expand::expand_arrays;

pub(crate) struct TestProject {
    model: String,
    project: Project,
}

impl TestProject {
    pub(crate) fn new(model: &str) -> Self {
        let mut project = Project::default();
        project.models.insert(
            model.to_owned(),
            crate::datamodel::Model {
                name: Some(model.to_owned()),
                entities: Default::default(),
            },
        );
        TestProject {
            model: model.to_owned(),
            project,
        }
    }

    pub(crate) fn dimension(mut self, name: &str, labels: &[&str]) -> Self {
        self.project.dimensions.insert(
            name.to_owned(),
            Dimension {
                labels: labels.iter().map(|l| (*l).to_owned()).collect(),
                variables: Some(vec![]),
            },
        );
        self
    }

    /// Register `var` as indexed by `dim` without declaring an entity for it.
    pub(crate) fn indexed_by(mut self, var: &str, dims: &[&str]) -> Self {
        for dim in dims {
            let dim = self
                .project
                .dimensions
                .entry((*dim).to_owned())
                .or_default();
            dim.variables
                .get_or_insert_with(Vec::new)
                .push(VariableRef::new(&self.model, var));
        }
        self
    }

    pub(crate) fn scalar(self, kind: &str, name: &str, eqn: Expr) -> Self {
        self.push(kind, Entity::new(name, eqn))
    }

    /// An arrayed entity, registered as indexed by each of its dimensions.
    pub(crate) fn arrayed(self, kind: &str, name: &str, dims: &[&str], eqn: Expr) -> Self {
        let mut entity = Entity::new(name, eqn);
        entity.dimensions = Some(dims.iter().map(|d| (*d).to_owned()).collect());
        self.indexed_by(name, dims).push(kind, entity)
    }

    /// An arrayed entity with one equation per element.
    pub(crate) fn branches(self, kind: &str, name: &str, dims: &[&str], eqns: Vec<Expr>) -> Self {
        let mut entity = Entity::new(name, Expr::int(0));
        entity.dimensions = Some(dims.iter().map(|d| (*d).to_owned()).collect());
        entity.equation_parsed = EquationTree::Branches(eqns);
        self.indexed_by(name, dims).push(kind, entity)
    }

    pub(crate) fn entity(self, kind: &str, entity: Entity) -> Self {
        self.push(kind, entity)
    }

    fn push(mut self, kind: &str, entity: Entity) -> Self {
        self.project.models[&self.model]
            .entities
            .entry(kind.to_owned())
            .or_default()
            .push(entity);
        self
    }

    pub(crate) fn build(self) -> Project {
        self.project
    }

    pub(crate) fn try_expand(self) -> Result<Project> {
        expand_arrays(self.project)
    }

    pub(crate) fn expand(self) -> Project {
        let model = self.model.clone();
        self.try_expand()
            .unwrap_or_else(|err| panic!("expanding '{model}' failed: {err}"))
    }
}

/// The single equation of the entity with the given compound key.
pub(crate) fn equation_of<'a>(
    project: &'a Project,
    model: &str,
    kind: &str,
    name: &str,
    labels: &[&str],
) -> &'a Expr {
    let key = EntityKey::new(name, labels);
    project.models[model]
        .entity(kind, &key)
        .unwrap_or_else(|| panic!("no entity {key} in {model}.{kind}"))
        .equation()
        .unwrap_or_else(|| panic!("entity {key} has no single equation"))
}

/// The compound keys of every entity of a kind, in order.
pub(crate) fn keys_of(project: &Project, model: &str, kind: &str) -> Vec<String> {
    project.models[model].entities[kind]
        .iter()
        .map(|entity| format!("{}", entity.key()))
        .collect()
}
