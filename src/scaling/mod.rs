//! Calculation of scaling factors from symbolic scaling expressions.
//!
//! A scaling expression is attached to a variable, constraint or named
//! expression in the scaling expression store of the block that declares it.
//! [calculate_scaling_factors] evaluates every scaling expression in a block
//! tree, substituting each variable and named expression by the first
//! available quantity of an ordered list of [ScalingBasis], and writes the
//! results into the scaling factor stores.
//!
//! # Examples
//!
//! ```
//! # use pse::{Model, PseResult, Relation};
//! # use pse::scaling::{calculate_scaling_factors, ScalingBasis};
//! # fn main() -> PseResult<()> {
//! let mut model = Model::new();
//! let root = model.root();
//! let x = model.add_var(root, "x").value(2.0).bounds(1.0, 7.0).build()?;
//! let y = model.add_var(root, "y").value(3.0).build()?;
//! let c = model.add_constraint(root, "c", Relation::equal(x * y, 6.0))?;
//! model.set_scaling_expression(c, 1.0 / (x * y));
//!
//! calculate_scaling_factors(&mut model, root, ScalingBasis::Value)?;
//! assert_eq!(model.scaling_factor(c), Some(1.0 / 6.0));
//!
//! // `y` has no bounds and falls back to its value
//! calculate_scaling_factors(&mut model, root, [ScalingBasis::Mid, ScalingBasis::Value])?;
//! assert_eq!(model.scaling_factor(c), Some(1.0 / 12.0));
//! # Ok(())
//! # }
//! ```
use pse_core::{log_iter, log_result};
use pse_core::{BlockId, Component, Model, PseError, PseResult, Variable, Verbosity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

mod basis;
mod util;

pub use basis::{BasisResolver, Resolution};
pub use util::{
    badly_scaled_variables, scaling_factor_json, scaling_factor_map, unscaled_constraints,
    unscaled_variables,
};

/// Quantity substituted for a variable when evaluating a scaling expression.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalingBasis {
    /// Current value.
    Value,
    /// Midpoint of the bounds.
    Mid,
    /// Lower bound.
    Lower,
    /// Upper bound.
    Upper,
    /// Existing scaling factor.
    VarScale,
    /// Reciprocal of the existing scaling factor.
    InverseVarScale,
}

impl ScalingBasis {
    pub const ALL: [Self; 6] = [
        Self::Value,
        Self::Mid,
        Self::Lower,
        Self::Upper,
        Self::VarScale,
        Self::InverseVarScale,
    ];

    /// The variable attribute substituted by this basis, if the basis does
    /// not refer to existing scaling factors.
    pub fn attribute(self) -> Option<fn(&Variable) -> Option<f64>> {
        match self {
            Self::Value => Some(Variable::value),
            Self::Mid => Some(Variable::midpoint),
            Self::Lower => Some(Variable::lb),
            Self::Upper => Some(Variable::ub),
            Self::VarScale | Self::InverseVarScale => None,
        }
    }

    fn is_bound(self) -> bool {
        matches!(self, Self::Lower | Self::Upper)
    }
}

impl fmt::Display for ScalingBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Value => "Value",
            Self::Mid => "Mid",
            Self::Lower => "Lower",
            Self::Upper => "Upper",
            Self::VarScale => "VarScale",
            Self::InverseVarScale => "InverseVarScale",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ScalingBasis {
    type Err = PseError;

    fn from_str(s: &str) -> PseResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|basis| basis.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| PseError::UnknownScalingBasis(s.into()))
    }
}

/// Ordered list of scaling bases. Earlier entries take precedence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct BasisPriority(Vec<ScalingBasis>);

impl BasisPriority {
    pub fn new(basis: Vec<ScalingBasis>) -> PseResult<Self> {
        let basis = Self(basis);
        basis.check()?;
        Ok(basis)
    }

    pub fn check(&self) -> PseResult<()> {
        if self.0.is_empty() {
            return Err(PseError::EmptyScalingBasis);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = ScalingBasis> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ScalingBasis] {
        &self.0
    }

    /// Whether the list contains `Lower` or `Upper`, which enables the
    /// bound fallback.
    pub fn uses_bounds(&self) -> bool {
        self.0.iter().any(|b| b.is_bound())
    }
}

impl From<ScalingBasis> for BasisPriority {
    fn from(basis: ScalingBasis) -> Self {
        Self(vec![basis])
    }
}

impl From<Vec<ScalingBasis>> for BasisPriority {
    fn from(basis: Vec<ScalingBasis>) -> Self {
        Self(basis)
    }
}

impl From<&[ScalingBasis]> for BasisPriority {
    fn from(basis: &[ScalingBasis]) -> Self {
        Self(basis.to_vec())
    }
}

impl<const N: usize> From<[ScalingBasis; N]> for BasisPriority {
    fn from(basis: [ScalingBasis; N]) -> Self {
        Self(basis.to_vec())
    }
}

impl FromStr for BasisPriority {
    type Err = PseError;

    /// Parses a comma separated list, e.g. `"Mid, InverseVarScale"`.
    fn from_str(s: &str) -> PseResult<Self> {
        let basis = s
            .split(',')
            .filter(|b| !b.trim().is_empty())
            .map(ScalingBasis::from_str)
            .collect::<PseResult<Vec<_>>>()?;
        Self::new(basis)
    }
}

impl fmt::Display for BasisPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basis: Vec<_> = self.0.iter().map(|b| b.to_string()).collect();
        write!(f, "[{}]", basis.join(", "))
    }
}

/// Options for the scaling factor calculation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ScalingOptions {
    /// Output indicated by the [Verbosity] enum.
    pub verbosity: Verbosity,
    /// Value substituted for quantities without any applicable basis if the
    /// basis list contains `Lower` or `Upper`. [None] disables the fallback.
    pub bound_fallback: Option<f64>,
    /// Also scale variables without a scaling expression directly from their
    /// value, bounds or existing scaling factor.
    pub scale_unannotated_variables: bool,
}

impl Default for ScalingOptions {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::None,
            bound_fallback: Some(1.0),
            scale_unannotated_variables: false,
        }
    }
}

impl ScalingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn bound_fallback(mut self, bound_fallback: Option<f64>) -> Self {
        self.bound_fallback = bound_fallback;
        self
    }

    pub fn scale_unannotated_variables(mut self, scale: bool) -> Self {
        self.scale_unannotated_variables = scale;
        self
    }
}

/// Basis list and options of a scaling calculation as read from JSON.
///
/// ```json
/// {"basis": ["Mid", "InverseVarScale"], "verbosity": "Result", "bound_fallback": null}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScalingConfig {
    pub basis: Vec<String>,
    #[serde(flatten)]
    pub options: ScalingOptions,
}

impl ScalingConfig {
    pub fn new(basis: &BasisPriority, options: ScalingOptions) -> Self {
        Self {
            basis: basis.iter().map(|b| b.to_string()).collect(),
            options,
        }
    }

    pub fn from_json<P: AsRef<Path>>(file: P) -> PseResult<Self> {
        let reader = BufReader::new(File::open(file)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parses the basis list.
    pub fn basis_priority(&self) -> PseResult<BasisPriority> {
        let basis = self
            .basis
            .iter()
            .map(|b| b.parse())
            .collect::<PseResult<Vec<_>>>()?;
        BasisPriority::new(basis)
    }
}

/// Summary of a scaling calculation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalingReport {
    /// Number of variables that received a scaling factor.
    pub variables: usize,
    pub constraints: usize,
    pub expressions: usize,
    /// Number of components with a scaling expression (or eligible for
    /// direct scaling) that could not be resolved.
    pub skipped: usize,
}

impl ScalingReport {
    pub fn scaled(&self) -> usize {
        self.variables + self.constraints + self.expressions
    }

    fn count(&mut self, component: Component) {
        match component {
            Component::Var(_) => self.variables += 1,
            Component::Constraint(_) => self.constraints += 1,
            Component::Expression(_) => self.expressions += 1,
        }
    }
}

impl fmt::Display for ScalingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} variables, {} constraints and {} expressions scaled, {} skipped",
            self.variables, self.constraints, self.expressions, self.skipped
        )
    }
}

/// Calculates scaling factors for all components in the subtree of `block`
/// using default options.
pub fn calculate_scaling_factors<B: Into<BasisPriority>>(
    model: &mut Model,
    block: BlockId,
    basis: B,
) -> PseResult<ScalingReport> {
    calculate_scaling_factors_with_options(model, block, basis, ScalingOptions::default())
}

/// Calculates scaling factors for all components in the subtree of `block`.
///
/// Blocks are visited depth first in declaration order. All factors are
/// resolved against the scaling factors present before the call and
/// written afterwards. Components that cannot be resolved keep their
/// previous scaling factor. Scaling expressions are never modified.
///
/// # Panics
///
/// Panics if a scaling expression refers to variables or named expressions
/// of another model.
pub fn calculate_scaling_factors_with_options<B: Into<BasisPriority>>(
    model: &mut Model,
    block: BlockId,
    basis: B,
    options: ScalingOptions,
) -> PseResult<ScalingReport> {
    let basis = basis.into();
    basis.check()?;
    model.check_block(block)?;
    let verbosity = options.verbosity;

    log_result!(
        verbosity,
        "Calculating scaling factors for {} with basis {basis}",
        model.block_name(block)
    );
    log_iter!(verbosity, " {:<40} | {:>14}", "component", "scaling factor");
    log_iter!(verbosity, "{:-<59}", "");

    let mut report = ScalingReport::default();
    let mut factors = Vec::new();
    let resolver = BasisResolver::new(model, &basis, &options);
    for component in model.components(block) {
        if !resolver.is_scalable(component) {
            continue;
        }
        match resolver.resolve(component) {
            Resolution::Resolved(factor) => {
                log_iter!(verbosity, " {:<40} | {:>14.8e}", model.name(component), factor);
                report.count(component);
                factors.push((component, factor));
            }
            Resolution::NotApplicable => {
                log_iter!(verbosity, " {:<40} | {:>14}", model.name(component), "skipped");
                report.skipped += 1;
            }
        }
    }

    for (component, factor) in factors {
        model.set_scaling_factor(component, factor);
    }
    log_result!(verbosity, "Scaling finished: {report}");
    Ok(report)
}

/// Calculates scaling factors with the basis list and options of `config`.
pub fn calculate_scaling_factors_from_config(
    model: &mut Model,
    block: BlockId,
    config: &ScalingConfig,
) -> PseResult<ScalingReport> {
    let basis = config.basis_priority()?;
    calculate_scaling_factors_with_options(model, block, basis, config.options)
}
