use approx::assert_relative_eq;
use pse::scaling::{calculate_scaling_factors, ScalingBasis, ScalingReport};
use pse::{Component, ConstraintId, Model, PseResult, Relation, VarId};
use std::error::Error;

struct Example {
    model: Model,
    x: VarId,
    y: VarId,
    z: [VarId; 3],
    c1: ConstraintId,
    c2: ConstraintId,
    c3: ConstraintId,
}

/// Two scalar variables, an indexed variable, two constraints on a sub-block
/// and a constraint on a named expression on the root block.
fn example() -> PseResult<Example> {
    let mut model = Model::new();
    let root = model.root();
    let x = model.add_var(root, "x").value(2.0).bounds(1.0, 7.0).build()?;
    let y = model.add_var(root, "y").value(3.0).build()?;
    let z = model.add_var(root, "z").value(0.0).build_indexed(1..=3)?;
    let z = [z[&1], z[&2], z[&3]];
    model.set_scaling_factor(x, 1.0 / 10.0);
    model.set_scaling_factor(y, 1.0 / 11.0);

    let b1 = model.add_block(root, "b1")?;
    let c1 = model.add_constraint(b1, "c1", Relation::equal(z[0], x + y))?;
    let c2 = model.add_constraint(b1, "c2", Relation::equal(z[1], x * y))?;
    let e1 = model.add_expression(root, "e1", y * x)?;
    model.set_scaling_factor(e1, 1.0 / 200.0);
    let c3 = model.add_constraint(root, "c3", Relation::equal(z[2], e1))?;

    model.set_scaling_expression(z[0], 1.0 / y);
    model.set_scaling_expression(z[1], 1.0 / (2.0 * x * y));
    model.set_scaling_expression(c3, 1.0 / e1);
    model.set_scaling_expression(c1, 1.0 / x);
    model.set_scaling_expression(c2, 1.0 / (x * y));

    Ok(Example {
        model,
        x,
        y,
        z,
        c1,
        c2,
        c3,
    })
}

/// Scaling factors of `[z[1], z[2], c1, c2, c3]` after a calculation with `basis`.
fn factors<B: Into<pse::scaling::BasisPriority>>(basis: B) -> PseResult<[f64; 5]> {
    let Example {
        mut model,
        x,
        y,
        z,
        c1,
        c2,
        c3,
    } = example()?;
    let root = model.root();
    let report = calculate_scaling_factors(&mut model, root, basis)?;
    assert_eq!(
        report,
        ScalingReport {
            variables: 2,
            constraints: 3,
            expressions: 0,
            skipped: 0
        }
    );

    // variables without a scaling expression keep their factors
    assert_relative_eq!(model.scaling_factor(x).unwrap(), 1.0 / 10.0);
    assert_relative_eq!(model.scaling_factor(y).unwrap(), 1.0 / 11.0);
    assert_eq!(model.scaling_factor(z[2]), None);

    let sf = |c: Component| model.scaling_factor(c).unwrap();
    Ok([
        sf(z[0].into()),
        sf(z[1].into()),
        sf(c1.into()),
        sf(c2.into()),
        sf(c3.into()),
    ])
}

fn assert_factors(actual: [f64; 5], expected: [f64; 5]) {
    for (a, e) in actual.into_iter().zip(expected) {
        assert_relative_eq!(a, e, max_relative = 1e-12);
    }
}

#[test]
fn test_value() -> Result<(), Box<dyn Error>> {
    let sf = factors(ScalingBasis::Value)?;
    assert_factors(sf, [1.0 / 3.0, 1.0 / 12.0, 1.0 / 2.0, 1.0 / 6.0, 1.0 / 6.0]);
    Ok(())
}

#[test]
fn test_inverse_var_scale() -> Result<(), Box<dyn Error>> {
    let sf = factors(ScalingBasis::InverseVarScale)?;
    assert_factors(
        sf,
        [1.0 / 11.0, 1.0 / 220.0, 1.0 / 10.0, 1.0 / 110.0, 1.0 / 200.0],
    );
    Ok(())
}

#[test]
fn test_var_scale() -> Result<(), Box<dyn Error>> {
    let sf = factors(ScalingBasis::VarScale)?;
    assert_factors(sf, [11.0, 55.0, 10.0, 110.0, 200.0]);
    Ok(())
}

#[test]
fn test_mid_with_fallback() -> Result<(), Box<dyn Error>> {
    let sf = factors([ScalingBasis::Mid, ScalingBasis::InverseVarScale])?;
    assert_factors(
        sf,
        [1.0 / 11.0, 1.0 / 88.0, 1.0 / 4.0, 1.0 / 44.0, 1.0 / 200.0],
    );
    Ok(())
}

#[test]
fn test_lower() -> Result<(), Box<dyn Error>> {
    let sf = factors(ScalingBasis::Lower)?;
    assert_factors(sf, [1.0, 1.0 / 2.0, 1.0, 1.0, 1.0]);
    Ok(())
}

#[test]
fn test_upper() -> Result<(), Box<dyn Error>> {
    let sf = factors(ScalingBasis::Upper)?;
    assert_factors(sf, [1.0, 1.0 / 14.0, 1.0 / 7.0, 1.0 / 7.0, 1.0]);
    Ok(())
}

#[test]
fn test_scaling_expressions_unchanged() -> Result<(), Box<dyn Error>> {
    let Example {
        mut model,
        z,
        c1,
        c2,
        ..
    } = example()?;
    let root = model.root();
    let display = |model: &Model| -> [String; 4] {
        [
            Component::Var(z[0]),
            Component::Var(z[1]),
            Component::Constraint(c1),
            Component::Constraint(c2),
        ]
        .map(|c| {
            let expr = model.scaling_expression(c).unwrap();
            model.display(expr).to_string()
        })
    };
    let before = display(&model);

    for basis in ScalingBasis::ALL {
        calculate_scaling_factors(&mut model, root, basis)?;
    }

    assert_eq!(display(&model), before);
    let value = |c: Component| model.value(model.scaling_expression(c).unwrap()).unwrap();
    assert_relative_eq!(value(z[0].into()), 1.0 / 3.0);
    assert_relative_eq!(value(z[1].into()), 1.0 / 12.0);
    assert_relative_eq!(value(c1.into()), 1.0 / 2.0);
    assert_relative_eq!(value(c2.into()), 1.0 / 6.0);
    Ok(())
}

#[test]
fn test_idempotence() -> Result<(), Box<dyn Error>> {
    let Example { mut model, .. } = example()?;
    let root = model.root();
    let basis = [ScalingBasis::Mid, ScalingBasis::InverseVarScale];
    calculate_scaling_factors(&mut model, root, basis)?;
    let first = pse::scaling::scaling_factor_map(&model, root);
    calculate_scaling_factors(&mut model, root, basis)?;
    assert_eq!(pse::scaling::scaling_factor_map(&model, root), first);
    Ok(())
}
