// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::ast::Expr;
use crate::common::{ElementName, Result};
use crate::var_err;

/// The concrete element(s) a single subscript argument denotes.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// A single, already-concrete element.
    Label(ElementName),
    /// A (possibly empty) ordered run of elements.
    Labels(Vec<ElementName>),
    /// A subscript that can't be resolved statically, like a variable
    /// used as an index.  Left for later passes.
    Passthrough(Expr),
}

impl Resolved {
    /// The subscript nodes this resolution expands to along its axis.
    pub fn into_args(self) -> Vec<Expr> {
        match self {
            Resolved::Label(name) => vec![Expr::Label { name }],
            Resolved::Labels(names) => names.into_iter().map(|name| Expr::Label { name }).collect(),
            Resolved::Passthrough(expr) => vec![expr],
        }
    }
}

/// Resolve a subscript argument against the ordered labels of the
/// dimension it indexes.
///
/// Range bounds match the *last* occurrence of each label, as a
/// dimension's label list may repeat names across sub-ranges.  A range
/// whose end precedes its start is empty.
pub fn resolve(arg: &Expr, labels: &[ElementName]) -> Result<Resolved> {
    match arg {
        Expr::Asterisk => Ok(Resolved::Labels(labels.to_vec())),
        Expr::Range { args: (start, end) } => {
            let start_off = last_offset(labels, &start.name)?;
            let end_off = last_offset(labels, &end.name)?;
            if end_off < start_off {
                Ok(Resolved::Labels(vec![]))
            } else {
                Ok(Resolved::Labels(labels[start_off..=end_off].to_vec()))
            }
        }
        Expr::Label { name } => Ok(Resolved::Label(name.clone())),
        Expr::Identifier { .. } => Ok(Resolved::Passthrough(arg.clone())),
        Expr::Number { .. } | Expr::Array { .. } | Expr::Operator { .. } | Expr::Call { .. } => {
            var_err!(
                UnsupportedSubscript,
                format!(
                    "unsupported expression in array subscript: {} ({arg})",
                    arg.type_name()
                )
            )
        }
    }
}

fn last_offset(labels: &[ElementName], name: &str) -> Result<usize> {
    match labels.iter().rposition(|label| label == name) {
        Some(off) => Ok(off),
        None => var_err!(
            BadSubscriptRange,
            format!("range bound '{name}' is not an element of [{}]", labels.join(", "))
        ),
    }
}
