use pse_core::{BlockId, Component, ConstraintId, Model, PseResult, VarId};
use indexmap::IndexMap;

/// Variables in the subtree of `block` without a scaling factor.
pub fn unscaled_variables(model: &Model, block: BlockId) -> Vec<VarId> {
    model
        .components(block)
        .filter_map(|c| match c {
            Component::Var(v) if model.scaling_factor(v).is_none() => Some(v),
            _ => None,
        })
        .collect()
}

/// Constraints in the subtree of `block` without a scaling factor.
pub fn unscaled_constraints(model: &Model, block: BlockId) -> Vec<ConstraintId> {
    model
        .components(block)
        .filter_map(|c| match c {
            Component::Constraint(c) if model.scaling_factor(c).is_none() => Some(c),
            _ => None,
        })
        .collect()
}

/// Variables whose scaled value `|value * scaling factor|` is larger than
/// `large`, or smaller than `small` but not below `zero`.
///
/// Fixed variables and variables without a value are ignored, missing
/// scaling factors count as 1.
pub fn badly_scaled_variables(
    model: &Model,
    block: BlockId,
    large: f64,
    small: f64,
    zero: f64,
) -> Vec<(VarId, f64)> {
    model
        .components(block)
        .filter_map(|c| match c {
            Component::Var(v) if !model.variable(v).is_fixed() => {
                let value = model.variable(v).value()?;
                let scaled = (value * model.scaling_factor(v).unwrap_or(1.0)).abs();
                (scaled > large || (scaled >= zero && scaled < small)).then_some((v, scaled))
            }
            _ => None,
        })
        .collect()
}

/// Scaling factors stored in exported stores of the subtree of `block`,
/// keyed by the fully qualified component name.
pub fn scaling_factor_map(model: &Model, block: BlockId) -> IndexMap<String, f64> {
    model
        .blocks(block)
        .into_iter()
        .filter_map(|b| model.block(b).scaling_factor())
        .filter(|suffix| suffix.direction().is_export())
        .flat_map(|suffix| suffix.iter())
        .map(|(c, &sf)| (model.name(c), sf))
        .collect()
}

/// [scaling_factor_map] serialized as a JSON object.
pub fn scaling_factor_json(model: &Model, block: BlockId) -> PseResult<String> {
    Ok(serde_json::to_string_pretty(&scaling_factor_map(model, block))?)
}
