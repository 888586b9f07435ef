use approx::assert_relative_eq;
use pse::scaling::{calculate_scaling_factors, unscaled_constraints, ScalingBasis};
use pse::{Model, Relation};
use std::error::Error;

#[test]
fn test_scaling_expressions_are_local() -> Result<(), Box<dyn Error>> {
    let mut model = Model::new();
    let root = model.root();
    let b1 = model.add_block(root, "b1")?;
    let b2 = model.add_block(root, "b2")?;
    let x = model.add_var(root, "x").value(4.0).build()?;
    let c_1 = model.add_constraint(b1, "c", Relation::equal(x, 1.0))?;
    let c_2 = model.add_constraint(b2, "c", Relation::equal(x, 2.0))?;

    // the entry for b2.c is placed on b1 and is never consulted
    model.block_mut(b1).scaling_expression_mut().insert(c_2, 1.0 / x);
    model.set_scaling_expression(c_1, 2.0 / x);

    let report = calculate_scaling_factors(&mut model, root, ScalingBasis::Value)?;
    assert_eq!(report.constraints, 1);
    assert_relative_eq!(model.scaling_factor(c_1).unwrap(), 0.5);
    assert_eq!(model.scaling_factor(c_2), None);
    assert_eq!(unscaled_constraints(&model, root), vec![c_2]);

    // written into the store of the owning block
    assert!(model.block(b1).scaling_factor().unwrap().contains(c_1));
    assert!(model.block(root).scaling_factor().is_none());
    assert!(model.block(b2).scaling_factor().is_none());
    Ok(())
}

#[test]
fn test_nested_blocks() -> Result<(), Box<dyn Error>> {
    let mut model = Model::new();
    let root = model.root();
    let unit = model.add_block(root, "unit")?;
    let inlet = model.add_block(unit, "inlet")?;
    let outlet = model.add_block(unit, "outlet")?;
    let f_in = model.add_var(inlet, "flow").value(50.0).build()?;
    let f_out = model.add_var(outlet, "flow").value(40.0).build()?;
    let loss = model.add_expression(unit, "loss", f_in - f_out)?;
    let balance = model.add_constraint(unit, "balance", Relation::equal(loss, 10.0))?;

    model.set_scaling_expression(f_in, 1.0 / f_in);
    model.set_scaling_expression(f_out, 1.0 / f_out);
    model.set_scaling_expression(loss, 1.0 / loss);
    model.set_scaling_expression(balance, 1.0 / f_in);

    // only the subtree of the inlet
    let report = calculate_scaling_factors(&mut model, inlet, ScalingBasis::Value)?;
    assert_eq!(report.scaled(), 1);
    assert_relative_eq!(model.scaling_factor(f_in).unwrap(), 0.02);
    assert_eq!(model.scaling_factor(f_out), None);

    let report = calculate_scaling_factors(&mut model, root, ScalingBasis::Value)?;
    assert_eq!((report.variables, report.constraints, report.expressions), (2, 1, 1));
    assert_relative_eq!(model.scaling_factor(f_out).unwrap(), 0.025);
    assert_relative_eq!(model.scaling_factor(loss).unwrap(), 0.1);
    assert_relative_eq!(model.scaling_factor(balance).unwrap(), 0.02);
    Ok(())
}

#[test]
fn test_snapshot() -> Result<(), Box<dyn Error>> {
    // the factor of `y` depends on the factor of `x` written in the same pass
    let mut model = Model::new();
    let root = model.root();
    let x = model.add_var(root, "x").value(5.0).build()?;
    let y = model.add_var(root, "y").value(1.0).build()?;
    model.set_scaling_factor(x, 1.0);
    model.set_scaling_expression(x, 1.0 / x);
    model.set_scaling_expression(y, 1.0 / x);

    calculate_scaling_factors(&mut model, root, ScalingBasis::Value)?;
    assert_relative_eq!(model.scaling_factor(x).unwrap(), 0.2);
    assert_relative_eq!(model.scaling_factor(y).unwrap(), 0.2);

    calculate_scaling_factors(&mut model, root, ScalingBasis::VarScale)?;
    assert_relative_eq!(model.scaling_factor(x).unwrap(), 5.0);
    // evaluated with the factor of `x` from before the pass
    assert_relative_eq!(model.scaling_factor(y).unwrap(), 5.0);
    Ok(())
}
