//! Algebraic expression trees over model variables and named expressions.
//!
//! Expressions are built with the usual arithmetic operators from constants,
//! variable handles ([VarId]) and named expression handles ([ExpressionId]):
//!
//! ```
//! # use pse_core::{Model, PseResult};
//! # fn main() -> PseResult<()> {
//! let mut model = Model::new();
//! let root = model.root();
//! let x = model.add_var(root, "x").value(2.0).build()?;
//! let y = model.add_var(root, "y").value(3.0).build()?;
//! let e = 1.0 / (2.0 * x * y);
//! assert_eq!(model.value(&e), Some(1.0 / 12.0));
//! # Ok(())
//! # }
//! ```
use crate::model::{ExpressionId, VarId};
use num_dual::DualNum;

mod fmt;
mod ops;

pub use fmt::ExprDisplay;

/// Binary operators of an expression tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Elementary functions of a single argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryFunction {
    Exp,
    Ln,
    Log10,
    Sqrt,
}

/// A symbolic algebraic expression.
///
/// Leaves are constants, variables and references to named expressions.
/// Named expressions are not expanded when the tree is built, so a
/// [Substitution] decides how they are evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Constant(f64),
    Variable(VarId),
    Named(ExpressionId),
    Negation(Box<Expr>),
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Unary(UnaryFunction, Box<Expr>),
}

/// Provides values for the leaves of an expression during evaluation.
///
/// Returning `None` for any leaf aborts the evaluation of the whole
/// expression.
pub trait Substitution<D> {
    fn variable(&mut self, var: VarId) -> Option<D>;
    fn expression(&mut self, expr: ExpressionId) -> Option<D>;
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    fn unary(function: UnaryFunction, arg: Expr) -> Self {
        Self::Unary(function, Box::new(arg))
    }

    /// `self` raised to an arbitrary expression.
    pub fn pow<E: Into<Expr>>(self, exponent: E) -> Self {
        Self::binary(BinaryOperator::Pow, self, exponent.into())
    }

    pub fn powi(self, n: i32) -> Self {
        self.pow(n as f64)
    }

    pub fn powf(self, n: f64) -> Self {
        self.pow(n)
    }

    pub fn recip(self) -> Self {
        Self::binary(BinaryOperator::Div, Self::Constant(1.0), self)
    }

    pub fn exp(self) -> Self {
        Self::unary(UnaryFunction::Exp, self)
    }

    pub fn ln(self) -> Self {
        Self::unary(UnaryFunction::Ln, self)
    }

    pub fn log10(self) -> Self {
        Self::unary(UnaryFunction::Log10, self)
    }

    pub fn sqrt(self) -> Self {
        Self::unary(UnaryFunction::Sqrt, self)
    }

    /// Returns the value if the expression is a plain constant.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Calls `f` for every leaf of the tree, left to right.
    ///
    /// Named expressions are leaves and are not expanded.
    pub fn visit_leaves<F: FnMut(&Expr)>(&self, f: &mut F) {
        match self {
            Self::Constant(_) | Self::Variable(_) | Self::Named(_) => f(self),
            Self::Negation(x) | Self::Unary(_, x) => x.visit_leaves(f),
            Self::Binary(_, lhs, rhs) => {
                lhs.visit_leaves(f);
                rhs.visit_leaves(f);
            }
        }
    }

    /// Variables referenced directly by this expression in order of first
    /// appearance.
    pub fn variables(&self) -> Vec<VarId> {
        let mut vars = Vec::new();
        self.visit_leaves(&mut |leaf| {
            if let Self::Variable(v) = leaf {
                if !vars.contains(v) {
                    vars.push(*v);
                }
            }
        });
        vars
    }

    /// Named expressions referenced directly by this expression in order of
    /// first appearance.
    pub fn named_expressions(&self) -> Vec<ExpressionId> {
        let mut exprs = Vec::new();
        self.visit_leaves(&mut |leaf| {
            if let Self::Named(e) = leaf {
                if !exprs.contains(e) {
                    exprs.push(*e);
                }
            }
        });
        exprs
    }

    /// Evaluates the expression with leaf values taken from `substitution`.
    ///
    /// The evaluation is generic over dual numbers, so derivatives can be
    /// obtained by substituting a variable with a dual number.
    pub fn evaluate<D, S>(&self, substitution: &mut S) -> Option<D>
    where
        D: DualNum<f64> + Copy,
        S: Substitution<D> + ?Sized,
    {
        Some(match self {
            Self::Constant(c) => D::from(*c),
            Self::Variable(v) => substitution.variable(*v)?,
            Self::Named(e) => substitution.expression(*e)?,
            Self::Negation(x) => -x.evaluate(substitution)?,
            Self::Binary(op, lhs, rhs) => {
                let l = lhs.evaluate(substitution)?;
                match op {
                    BinaryOperator::Add => l + rhs.evaluate(substitution)?,
                    BinaryOperator::Sub => l - rhs.evaluate(substitution)?,
                    BinaryOperator::Mul => l * rhs.evaluate(substitution)?,
                    BinaryOperator::Div => l / rhs.evaluate(substitution)?,
                    BinaryOperator::Pow => match rhs.as_constant() {
                        Some(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                            l.powi(n as i32)
                        }
                        Some(n) => l.powf(n),
                        None => l.powd(rhs.evaluate(substitution)?),
                    },
                }
            }
            Self::Unary(function, x) => {
                let x = x.evaluate(substitution)?;
                match function {
                    UnaryFunction::Exp => x.exp(),
                    UnaryFunction::Ln => x.ln(),
                    UnaryFunction::Log10 => x.log10(),
                    UnaryFunction::Sqrt => x.sqrt(),
                }
            }
        })
    }
}

/// Exponential function.
pub fn exp<E: Into<Expr>>(x: E) -> Expr {
    x.into().exp()
}

/// Natural logarithm.
pub fn ln<E: Into<Expr>>(x: E) -> Expr {
    x.into().ln()
}

/// Decadic logarithm.
pub fn log10<E: Into<Expr>>(x: E) -> Expr {
    x.into().log10()
}

/// Square root.
pub fn sqrt<E: Into<Expr>>(x: E) -> Expr {
    x.into().sqrt()
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<VarId> for Expr {
    fn from(var: VarId) -> Self {
        Self::Variable(var)
    }
}

impl From<ExpressionId> for Expr {
    fn from(expr: ExpressionId) -> Self {
        Self::Named(expr)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}
