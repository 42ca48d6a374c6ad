// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::common::{ElementName, Ident};

/// One endpoint of a `range` subscript, e.g. `a` in `pop[a:c]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBound {
    pub name: ElementName,
}

/// Expr is a parsed equation as it appears in the IR.  Nodes own their
/// children; cloning an Expr produces an independent deep copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expr {
    /// A numeric literal, kept exactly as written: `3` and `3.0` are
    /// distinct, and large integers don't pass through a float.
    Number {
        value: Number,
    },
    /// A bare reference to a variable, before array resolution.
    Identifier {
        name: Ident,
    },
    /// A reference to specific element(s) of an arrayed variable.
    Array {
        name: Ident,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// A concrete dimension element.
    Label {
        name: ElementName,
    },
    /// Every element of the subscripted dimension.
    Asterisk,
    /// An inclusive span of elements between two named labels.
    Range {
        args: (RangeBound, RangeBound),
    },
    Operator {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn int(value: i64) -> Expr {
        Expr::Number {
            value: value.into(),
        }
    }

    /// A floating point literal; `None` for NaN and infinities, which
    /// have no JSON representation.
    pub fn float(value: f64) -> Option<Expr> {
        Number::from_f64(value).map(|value| Expr::Number { value })
    }

    pub fn ident(name: &str) -> Expr {
        Expr::Identifier {
            name: name.to_owned(),
        }
    }

    pub fn label(name: &str) -> Expr {
        Expr::Label {
            name: name.to_owned(),
        }
    }

    pub fn range(start: &str, end: &str) -> Expr {
        Expr::Range {
            args: (
                RangeBound {
                    name: start.to_owned(),
                },
                RangeBound {
                    name: end.to_owned(),
                },
            ),
        }
    }

    pub fn array(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Array {
            name: name.to_owned(),
            args,
        }
    }

    /// An array reference whose subscripts are all concrete labels.
    pub fn element(name: &str, labels: &[ElementName]) -> Expr {
        Expr::Array {
            name: name.to_owned(),
            args: labels.iter().map(|l| Expr::label(l)).collect(),
        }
    }

    pub fn op(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Operator {
            name: name.to_owned(),
            args,
        }
    }

    pub fn add(l: Expr, r: Expr) -> Expr {
        Expr::op("+", vec![l, r])
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            name: name.to_owned(),
            args,
        }
    }

    /// The node's tag as it appears in the IR's `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Number { .. } => "number",
            Expr::Identifier { .. } => "identifier",
            Expr::Array { .. } => "array",
            Expr::Label { .. } => "label",
            Expr::Asterisk => "asterisk",
            Expr::Range { .. } => "range",
            Expr::Operator { .. } => "operator",
            Expr::Call { .. } => "call",
        }
    }
}

fn child_needs_parens(parent: &Expr, child: &Expr) -> bool {
    match parent {
        // binary and unary operators are the only infix forms
        Expr::Operator { .. } => matches!(child, Expr::Operator { args, .. } if args.len() > 1),
        _ => false,
    }
}

fn paren_if_necessary(parent: &Expr, child: &Expr) -> String {
    if child_needs_parens(parent, child) {
        format!("({child})")
    } else {
        format!("{child}")
    }
}

fn comma_separated(args: &[Expr]) -> String {
    args.iter()
        .map(|arg| format!("{arg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number { value } => write!(f, "{value}"),
            Expr::Identifier { name } | Expr::Label { name } => write!(f, "{name}"),
            Expr::Array { name, args } => write!(f, "{name}[{}]", comma_separated(args)),
            Expr::Asterisk => write!(f, "*"),
            Expr::Range { args: (start, end) } => write!(f, "{}:{}", start.name, end.name),
            Expr::Operator { name, args } => match args.as_slice() {
                [r] => write!(f, "{name}{}", paren_if_necessary(self, r)),
                _ => {
                    let operands: Vec<String> = args
                        .iter()
                        .map(|arg| paren_if_necessary(self, arg))
                        .collect();
                    write!(f, "{}", operands.join(&format!(" {name} ")))
                }
            },
            Expr::Call { name, args } => write!(f, "{name}({})", comma_separated(args)),
        }
    }
}
