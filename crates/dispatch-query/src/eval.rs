//! Pure evaluation of a [`Predicate`] against an [`AstDecl`] (§4.O).
//!
//! No side effects, no interaction with dispatch: a declaration either
//! matches or it doesn't.

use crate::ast::AstDecl;
use crate::parser::{CompareOp, Predicate};

/// Evaluates `predicate` against `decl`, returning whether it matches.
#[must_use]
pub fn evaluate(predicate: &Predicate, decl: &AstDecl) -> bool {
    match predicate {
        Predicate::Kind(kind) => decl.kind == *kind,
        Predicate::Flag(name) => decl.flags.contains(name),
        Predicate::StringMethod { field, method, arg } => {
            let Some(value) = decl.string_fields.get(field) else {
                return false;
            };
            match method.as_str() {
                "eq" => value == arg,
                "ne" => value != arg,
                "contains" => value.contains(arg.as_str()),
                "starts_with" => value.starts_with(arg.as_str()),
                "ends_with" => value.ends_with(arg.as_str()),
                _ => false,
            }
        }
        Predicate::Numeric { field, op, value } => {
            let Some(actual) = decl.numeric_fields.get(field) else {
                return false;
            };
            match op {
                CompareOp::Eq => (*actual - *value).abs() < f64::EPSILON,
                CompareOp::Ne => (*actual - *value).abs() >= f64::EPSILON,
                CompareOp::Lt => *actual < *value,
                CompareOp::Le => *actual <= *value,
                CompareOp::Gt => *actual > *value,
                CompareOp::Ge => *actual >= *value,
            }
        }
        Predicate::Not(inner) => !evaluate(inner, decl),
        Predicate::And(lhs, rhs) => evaluate(lhs, decl) && evaluate(rhs, decl),
        Predicate::Or(lhs, rhs) => evaluate(lhs, decl) || evaluate(rhs, decl),
    }
}
