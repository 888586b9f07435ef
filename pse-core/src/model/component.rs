use super::{BlockId, Model, VarId};
use crate::expression::Expr;
use crate::{PseError, PseResult};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// A scalar decision variable.
#[derive(Debug, Clone)]
pub struct Variable {
    pub(super) name: String,
    pub(super) parent: BlockId,
    value: Option<f64>,
    lb: Option<f64>,
    ub: Option<f64>,
    fixed: bool,
    units: Option<String>,
    doc: Option<String>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> BlockId {
        self.parent
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn lb(&self) -> Option<f64> {
        self.lb
    }

    pub fn ub(&self) -> Option<f64> {
        self.ub
    }

    /// Midpoint of the bounds if both bounds are set.
    pub fn midpoint(&self) -> Option<f64> {
        Some(0.5 * (self.lb? + self.ub?))
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = Some(value);
    }

    pub fn set_lb(&mut self, lb: Option<f64>) {
        self.lb = lb;
    }

    pub fn set_ub(&mut self, ub: Option<f64>) {
        self.ub = ub;
    }

    /// Fixes the variable at the given value.
    pub fn fix(&mut self, value: f64) {
        self.value = Some(value);
        self.fixed = true;
    }

    pub fn unfix(&mut self) {
        self.fixed = false;
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |x: Option<f64>| x.map_or_else(|| "None".to_string(), |x| x.to_string());
        write!(
            f,
            "{}: value={}, lb={}, ub={}, fixed={}",
            self.name,
            show(self.value),
            show(self.lb),
            show(self.ub),
            self.fixed
        )?;
        if let Some(units) = &self.units {
            write!(f, ", units={units}")?;
        }
        Ok(())
    }
}

/// Builder for variables, created by [Model::add_var].
///
/// # Examples
///
/// ```
/// # use pse_core::{Model, PseResult};
/// # fn main() -> PseResult<()> {
/// let mut model = Model::new();
/// let root = model.root();
/// let x = model.add_var(root, "x").value(2.0).bounds(1.0, 7.0).build()?;
/// let z = model.add_var(root, "z").value(0.0).build_indexed([1, 2, 3])?;
/// assert_eq!(model.variable(x).midpoint(), Some(4.0));
/// assert_eq!(model.variable(z[&2]).name(), "z[2]");
/// # Ok(())
/// # }
/// ```
pub struct VarBuilder<'a> {
    model: &'a mut Model,
    block: BlockId,
    name: String,
    value: Option<f64>,
    lb: Option<f64>,
    ub: Option<f64>,
    fixed: bool,
    units: Option<String>,
    doc: Option<String>,
}

impl<'a> VarBuilder<'a> {
    pub(super) fn new(model: &'a mut Model, block: BlockId, name: String) -> Self {
        Self {
            model,
            block,
            name,
            value: None,
            lb: None,
            ub: None,
            fixed: false,
            units: None,
            doc: None,
        }
    }

    /// Provide the initial value.
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Provide a lower bound.
    pub fn lower(mut self, lb: f64) -> Self {
        self.lb = Some(lb);
        self
    }

    /// Provide an upper bound.
    pub fn upper(mut self, ub: f64) -> Self {
        self.ub = Some(ub);
        self
    }

    /// Provide both bounds.
    pub fn bounds(self, lb: f64, ub: f64) -> Self {
        self.lower(lb).upper(ub)
    }

    /// Declare the variable as fixed.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.into());
        self
    }

    fn check_bounds(&self) -> PseResult<()> {
        if let (Some(lb), Some(ub)) = (self.lb, self.ub) {
            if lb > ub {
                return Err(PseError::InvalidBounds(self.name.clone(), lb, ub));
            }
        }
        Ok(())
    }

    fn variable(&self, name: String) -> Variable {
        Variable {
            name,
            parent: self.block,
            value: self.value,
            lb: self.lb,
            ub: self.ub,
            fixed: self.fixed,
            units: self.units.clone(),
            doc: self.doc.clone(),
        }
    }

    /// Declare a scalar variable.
    pub fn build(mut self) -> PseResult<VarId> {
        self.check_bounds()?;
        let var = self.variable(self.name.clone());
        self.model.push_variable(var)
    }

    /// Declare one variable for every element of `index`, named `name[i]`.
    pub fn build_indexed<I, T>(mut self, index: I) -> PseResult<IndexMap<T, VarId>>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display + Hash + Eq,
    {
        self.check_bounds()?;
        let mut vars = IndexMap::new();
        for i in index {
            let var = self.variable(format!("{}[{}]", self.name, i));
            vars.insert(i, self.model.push_variable(var)?);
        }
        Ok(vars)
    }
}

/// An algebraic relation `lower <= body <= upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub body: Expr,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Relation {
    /// `lhs == rhs`
    pub fn equal<L: Into<Expr>, R: Into<Expr>>(lhs: L, rhs: R) -> Self {
        Self {
            body: lhs.into() - rhs.into(),
            lower: Some(0.0),
            upper: Some(0.0),
        }
    }

    /// `lhs <= rhs`
    pub fn less_equal<L: Into<Expr>, R: Into<Expr>>(lhs: L, rhs: R) -> Self {
        Self {
            body: lhs.into() - rhs.into(),
            lower: None,
            upper: Some(0.0),
        }
    }

    /// `lhs >= rhs`
    pub fn greater_equal<L: Into<Expr>, R: Into<Expr>>(lhs: L, rhs: R) -> Self {
        Self {
            body: lhs.into() - rhs.into(),
            lower: Some(0.0),
            upper: None,
        }
    }

    pub fn is_equality(&self) -> bool {
        self.lower.is_some() && self.lower == self.upper
    }
}

/// A constraint declared on a block.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub(super) name: String,
    pub(super) parent: BlockId,
    relation: Relation,
}

impl Constraint {
    pub(super) fn new(name: String, parent: BlockId, relation: Relation) -> Self {
        Self {
            name,
            parent,
            relation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> BlockId {
        self.parent
    }

    pub fn body(&self) -> &Expr {
        &self.relation.body
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }
}

/// A named, reusable expression declared on a block.
#[derive(Debug, Clone)]
pub struct NamedExpression {
    pub(super) name: String,
    pub(super) parent: BlockId,
    expr: Expr,
}

impl NamedExpression {
    pub(super) fn new(name: String, parent: BlockId, expr: Expr) -> Self {
        Self { name, parent, expr }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> BlockId {
        self.parent
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}
