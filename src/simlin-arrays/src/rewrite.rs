// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::ast::Expr;
use crate::common::{DimensionName, ElementName, Result};
use crate::dimensions::DimensionTable;
use crate::var_err;

/// The array element an equation is being rewritten for: one clone of an
/// arrayed entity.
#[derive(Clone, Copy, Debug)]
pub struct ElementContext<'a> {
    pub model: &'a str,
    pub dimensions: &'a [DimensionName],
    pub labels: &'a [ElementName],
}

impl ElementContext<'_> {
    /// The labels of this element along each of its dimensions that also
    /// index `name`, in the element's dimension order.
    fn shared_labels(&self, name: &str, dims: &DimensionTable) -> Result<Vec<Expr>> {
        let mut labels = vec![];
        for (pos, dim) in self.dimensions.iter().enumerate() {
            if !dims.indexes(dim, self.model, name)? {
                continue;
            }
            match self.labels.get(pos) {
                Some(label) => labels.push(Expr::label(label)),
                None => {
                    return var_err!(
                        MismatchedDimensions,
                        format!(
                            "no label for dimension '{dim}' (element has {} of {})",
                            self.labels.len(),
                            self.dimensions.len()
                        )
                    );
                }
            }
        }
        Ok(labels)
    }
}

/// Rewrite bare references to variables that share a dimension with the
/// current element into references to the matching element, e.g. within
/// `stock[north]` the identifier `inflow` becomes `inflow[north]` when
/// `inflow` is indexed by the same dimension.  Identifiers that share no
/// dimension with the element are left alone.
pub fn rewrite_identifiers(
    expr: &mut Expr,
    element: &ElementContext,
    dims: &DimensionTable,
) -> Result<()> {
    match expr {
        Expr::Array { args, .. } | Expr::Operator { args, .. } | Expr::Call { args, .. } => {
            for arg in args.iter_mut() {
                rewrite_identifiers(arg, element, dims)?;
            }
        }
        Expr::Identifier { name } => {
            let labels = element.shared_labels(name, dims)?;
            if !labels.is_empty() {
                *expr = Expr::Array {
                    name: std::mem::take(name),
                    args: labels,
                };
            }
        }
        Expr::Number { .. } | Expr::Label { .. } | Expr::Asterisk | Expr::Range { .. } => {}
    }
    Ok(())
}
