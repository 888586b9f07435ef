use super::{BasisPriority, ScalingBasis, ScalingOptions};
use pse_core::{Component, ExpressionId, Model, Substitution, VarId};

/// Outcome of resolving the scaling factor of a single component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Resolved(f64),
    NotApplicable,
}

impl Resolution {
    /// Only finite, non-zero factors are valid.
    fn from_factor(factor: Option<f64>) -> Self {
        match factor {
            Some(f) if f.is_finite() && f != 0.0 => Self::Resolved(f),
            _ => Self::NotApplicable,
        }
    }

    pub fn factor(self) -> Option<f64> {
        match self {
            Self::Resolved(f) => Some(f),
            Self::NotApplicable => None,
        }
    }
}

/// Resolves scaling factors of model components for a list of bases.
///
/// The scaling expression of a component is evaluated with every leaf
/// replaced by the first available quantity in basis order:
///
/// | basis             | variable leaf          | named expression leaf                  |
/// |-------------------|------------------------|----------------------------------------|
/// | `Value`           | value                  | definition evaluated at values         |
/// | `Lower`/`Upper`   | bound                  | definition evaluated at bounds         |
/// | `Mid`             | midpoint of the bounds | definition evaluated at midpoints      |
/// | `VarScale`        | scaling factor         | scaling factor                         |
/// | `InverseVarScale` | 1 / scaling factor     | 1 / scaling factor                     |
///
/// If no basis applies to a leaf, the bound fallback is used for lists that
/// contain `Lower` or `Upper`; otherwise the component is not resolved.
/// If the result is zero or not finite, e.g. for a variable with a value of
/// zero, the expression is evaluated again without the leading basis.
pub struct BasisResolver<'a> {
    model: &'a Model,
    basis: &'a BasisPriority,
    fallback: Option<f64>,
    scale_unannotated_variables: bool,
}

impl<'a> BasisResolver<'a> {
    pub fn new(model: &'a Model, basis: &'a BasisPriority, options: &ScalingOptions) -> Self {
        let fallback = options.bound_fallback.filter(|_| basis.uses_bounds());
        Self {
            model,
            basis,
            fallback,
            scale_unannotated_variables: options.scale_unannotated_variables,
        }
    }

    /// Whether `component` is considered by the calculation at all.
    pub fn is_scalable(&self, component: Component) -> bool {
        self.model.scaling_expression(component).is_some()
            || (self.scale_unannotated_variables && matches!(component, Component::Var(_)))
    }

    pub fn resolve(&self, component: Component) -> Resolution {
        match (self.model.scaling_expression(component), component) {
            (Some(expr), _) => {
                let basis = self.basis.as_slice();
                (0..basis.len())
                    .map(|i| expr.evaluate(&mut Leaves(self, &basis[i..])))
                    .map(Resolution::from_factor)
                    .find(|r| matches!(r, Resolution::Resolved(_)))
                    .unwrap_or(Resolution::NotApplicable)
            }
            (None, Component::Var(var)) if self.scale_unannotated_variables => {
                self.resolve_variable(var)
            }
            (None, _) => Resolution::NotApplicable,
        }
    }

    /// Direct rule for variables without a scaling expression: the
    /// reciprocal of the value or bound, or the existing scaling factor.
    fn resolve_variable(&self, var: VarId) -> Resolution {
        let variable = self.model.variable(var);
        let sf = self.model.scaling_factor(var);
        for basis in self.basis.iter() {
            let factor = match (basis, basis.attribute()) {
                (_, Some(attribute)) => attribute(variable).map(f64::recip),
                (ScalingBasis::VarScale, _) => sf,
                (_, None) => sf.map(f64::recip),
            };
            if let r @ Resolution::Resolved(_) = Resolution::from_factor(factor) {
                return r;
            }
        }
        Resolution::from_factor(self.fallback)
    }

    fn variable_leaf(&self, var: VarId, basis: &[ScalingBasis]) -> Option<f64> {
        let variable = self.model.variable(var);
        basis
            .iter()
            .find_map(|&basis| match basis.attribute() {
                Some(attribute) => attribute(variable),
                None => self.scale(basis, self.model.scaling_factor(var)),
            })
            .or(self.fallback)
    }

    fn expression_leaf(&self, expr: ExpressionId, basis: &[ScalingBasis]) -> Option<f64> {
        let definition = self.model.expression(expr).expr();
        basis
            .iter()
            .find_map(|&basis| match basis.attribute() {
                Some(attribute) => self.model.evaluate_with(definition, attribute),
                None => self.scale(basis, self.model.scaling_factor(expr)),
            })
            .or(self.fallback)
    }

    fn scale(&self, basis: ScalingBasis, sf: Option<f64>) -> Option<f64> {
        match basis {
            ScalingBasis::InverseVarScale => sf.map(f64::recip),
            _ => sf,
        }
    }
}

/// Leaf values for the bases in the slice.
struct Leaves<'r, 'a>(&'r BasisResolver<'a>, &'r [ScalingBasis]);

impl Substitution<f64> for Leaves<'_, '_> {
    fn variable(&mut self, var: VarId) -> Option<f64> {
        self.0.variable_leaf(var, self.1)
    }

    fn expression(&mut self, expr: ExpressionId) -> Option<f64> {
        self.0.expression_leaf(expr, self.1)
    }
}
