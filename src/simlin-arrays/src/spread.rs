// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::ast::Expr;
use crate::common::Result;
use crate::dimensions::{DimensionTable, cartesian_product};
use crate::subscript::resolve;
use crate::var_err;

/// Widen array-valued arguments of function calls into one argument per
/// concrete element.
///
/// Only `call` nodes (and calls nested directly as their arguments) are
/// transformed; operators inside call arguments are not descended into.
pub fn spread_arguments(expr: Expr, model: &str, dims: &DimensionTable) -> Result<Expr> {
    match expr {
        Expr::Call { name, args } => {
            let mut spread = Vec::with_capacity(args.len());
            for arg in args {
                spread_argument(arg, model, dims, &mut spread)?;
            }
            Ok(Expr::Call { name, args: spread })
        }
        _ => Ok(expr),
    }
}

fn spread_argument(
    arg: Expr,
    model: &str,
    dims: &DimensionTable,
    out: &mut Vec<Expr>,
) -> Result<()> {
    match arg {
        Expr::Identifier { name } => {
            let n = dims.dimension_count(model, &name);
            if n > 0 {
                out.push(Expr::Array {
                    name,
                    args: vec![Expr::Asterisk; n],
                });
            } else {
                out.push(Expr::Identifier { name });
            }
        }
        Expr::Array { name, args } if args.is_empty() => out.push(Expr::Array { name, args }),
        Expr::Array { name, args } => {
            let axes = dims.axes_of(model, &name);
            if args.len() > axes.len() {
                return var_err!(
                    MismatchedDimensions,
                    format!(
                        "'{name}' subscripted with {} indices but has {} dimensions",
                        args.len(),
                        axes.len()
                    )
                );
            }

            let per_axis = args
                .iter()
                .zip(axes.iter())
                .map(|(arg, (_, dim))| resolve(arg, &dim.labels).map(|r| r.into_args()))
                .collect::<Result<Vec<Vec<Expr>>>>()?;
            let per_axis: Vec<&[Expr]> = per_axis.iter().map(|axis| axis.as_slice()).collect();

            for element in cartesian_product(&per_axis) {
                out.push(Expr::Array {
                    name: name.clone(),
                    args: element,
                });
            }
        }
        call @ Expr::Call { .. } => out.push(spread_arguments(call, model, dims)?),
        other => out.push(other),
    }
    Ok(())
}
