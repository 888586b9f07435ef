#![warn(clippy::all)]
//! Core data structures for block-structured algebraic process models.
//!
//! A [Model] is a tree of blocks. Every block owns variables, constraints and
//! named expressions that are built from [Expr] trees, plus two annotation
//! stores ([Suffix]) for numeric scaling factors and symbolic scaling
//! expressions.
use serde::{Deserialize, Serialize};

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Result {
            println!($($arg)*);
        }
    }
}

mod errors;
pub mod expression;
pub mod model;
pub mod parameter;
pub mod units;

pub use errors::{PseError, PseResult};
pub use expression::{BinaryOperator, Expr, Substitution, UnaryFunction};
pub use model::{
    Block, BlockId, Component, Constraint, ConstraintId, ExpressionId, Model, NamedExpression,
    Relation, Suffix, SuffixDirection, VarBuilder, VarId, Variable,
};

/// Level of detail in the calculation output.
#[derive(Copy, Clone, Debug, PartialOrd, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verbosity {
    /// Do not print output.
    None,
    /// Print a summary after a calculation finished.
    Result,
    /// Print a line for every processed model component.
    Iter,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::None
    }
}
