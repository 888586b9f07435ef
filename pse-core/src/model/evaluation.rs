use super::{ConstraintId, ExpressionId, Model, VarId, Variable};
use crate::expression::{Expr, Substitution};
use num_dual::{Dual64, DualNum};

/// Substitutes one attribute of every variable.
///
/// Named expressions are evaluated from their definitions using the same
/// attribute. Evaluation fails if a variable does not carry the attribute.
pub struct AttributeSubstitution<'a, F> {
    model: &'a Model,
    attribute: F,
}

impl<'a, F: Fn(&Variable) -> Option<f64>> AttributeSubstitution<'a, F> {
    pub fn new(model: &'a Model, attribute: F) -> Self {
        Self { model, attribute }
    }
}

impl<D: DualNum<f64> + Copy, F: Fn(&Variable) -> Option<f64>> Substitution<D>
    for AttributeSubstitution<'_, F>
{
    fn variable(&mut self, var: VarId) -> Option<D> {
        (self.attribute)(self.model.variable(var)).map(D::from)
    }

    fn expression(&mut self, expr: ExpressionId) -> Option<D> {
        let model = self.model;
        model.expression(expr).expr().evaluate(self)
    }
}

struct DerivativeSubstitution<'a> {
    model: &'a Model,
    wrt: VarId,
}

impl Substitution<Dual64> for DerivativeSubstitution<'_> {
    fn variable(&mut self, var: VarId) -> Option<Dual64> {
        let value = Dual64::from(self.model.variable(var).value()?);
        Some(if var == self.wrt {
            value.derivative()
        } else {
            value
        })
    }

    fn expression(&mut self, expr: ExpressionId) -> Option<Dual64> {
        let model = self.model;
        model.expression(expr).expr().evaluate(self)
    }
}

impl Model {
    /// Evaluates an expression at the current variable values.
    pub fn value(&self, expr: &Expr) -> Option<f64> {
        self.evaluate_with(expr, Variable::value)
    }

    /// Evaluates an expression substituting `attribute` for every variable.
    pub fn evaluate_with<F: Fn(&Variable) -> Option<f64>>(
        &self,
        expr: &Expr,
        attribute: F,
    ) -> Option<f64> {
        expr.evaluate(&mut AttributeSubstitution::new(self, attribute))
    }

    /// Value and first derivative of an expression with respect to `wrt`
    /// at the current variable values.
    pub fn derivative(&self, expr: &Expr, wrt: VarId) -> Option<(f64, f64)> {
        let x: Dual64 = expr.evaluate(&mut DerivativeSubstitution { model: self, wrt })?;
        Some((x.re, x.eps))
    }

    /// Value of the body of a constraint at the current variable values.
    pub fn residual(&self, constraint: ConstraintId) -> Option<f64> {
        self.value(self.constraint(constraint).body())
    }
}
