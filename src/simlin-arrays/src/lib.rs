// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Array expansion for system dynamics models.
//!
//! Takes a project whose entities may be indexed by named dimensions and
//! rewrites it so that every arrayed entity is unrolled into one scalar
//! clone per element.  See [`expand_arrays`].

#![forbid(unsafe_code)]

pub mod ast;
pub mod common;
pub mod datamodel;
pub mod dimensions;
mod expand;
pub mod rewrite;
pub mod spread;
pub mod subscript;

#[cfg(test)]
mod expand_proptest;
#[cfg(test)]
mod testutils;

pub use self::ast::Expr;
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::datamodel::{Dimension, Entity, EntityKey, EquationTree, Model, Project};
pub use self::dimensions::DimensionTable;
pub use self::expand::{ExpandStats, expand_arrays, expand_project};
