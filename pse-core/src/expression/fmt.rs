use super::{BinaryOperator, Expr, UnaryFunction};
use crate::model::{Component, Model};
use std::fmt;

/// Helper returned by [Model::display] that prints an expression with the
/// fully qualified names of the referenced model components.
pub struct ExprDisplay<'a> {
    model: &'a Model,
    expr: &'a Expr,
}

impl<'a> ExprDisplay<'a> {
    pub(crate) fn new(model: &'a Model, expr: &'a Expr) -> Self {
        Self { model, expr }
    }
}

impl BinaryOperator {
    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }
}

impl fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
        };
        write!(f, "{name}")
    }
}

// negations bind like a sum when nested, but tighter than products on their operand
const NEGATION: u8 = 1;
const NEGATION_OPERAND: u8 = 3;
const ATOM: u8 = 5;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary(op, _, _) => op.precedence(),
        Expr::Negation(_) => NEGATION,
        Expr::Constant(c) if *c < 0.0 => NEGATION,
        _ => ATOM,
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, model: &Model, expr: &Expr, min: u8) -> fmt::Result {
    let parenthesize = precedence(expr) < min;
    if parenthesize {
        write!(f, "(")?;
    }
    match expr {
        Expr::Constant(c) => write!(f, "{c}")?,
        Expr::Variable(v) => write!(f, "{}", model.name(Component::Var(*v)))?,
        Expr::Named(e) => write!(f, "{}", model.name(Component::Expression(*e)))?,
        Expr::Negation(x) => {
            write!(f, "- ")?;
            write_expr(f, model, x, NEGATION_OPERAND)?;
        }
        Expr::Binary(op, lhs, rhs) => {
            let p = op.precedence();
            // `**` is right associative, all other operators are left associative
            let (l, r) = match op {
                BinaryOperator::Pow => (p + 1, p),
                BinaryOperator::Add | BinaryOperator::Mul => (p, p),
                BinaryOperator::Sub | BinaryOperator::Div => (p, p + 1),
            };
            write_expr(f, model, lhs, l)?;
            write!(f, "{}", op.symbol())?;
            write_expr(f, model, rhs, r)?;
        }
        Expr::Unary(function, x) => {
            write!(f, "{function}(")?;
            write_expr(f, model, x, 0)?;
            write!(f, ")")?;
        }
    }
    if parenthesize {
        write!(f, ")")?;
    }
    Ok(())
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.model, self.expr, 0)
    }
}
