use approx::assert_relative_eq;
use pse::parameter::{ComponentRecord, IdentifierOption};
use pse::pure::nist::{CpMolIgComp, EnthMolIgComp, EntrMolIgComp, PressureSatComp};
use pse::pure::{PropertyPackage, PureProperty};
use pse::scaling::badly_scaled_variables;
use pse::units::DerivedUnits;
use pse::{BlockId, Model, PseError, VarId};
use quantity::{BAR, JOULE, KELVIN, KILO, MOL};
use std::error::Error;

const PROPERTIES: [&dyn PureProperty; 4] =
    [&CpMolIgComp, &EnthMolIgComp, &EntrMolIgComp, &PressureSatComp];

struct Package {
    model: Model,
    params: PropertyPackage,
    water: BlockId,
    temperature: VarId,
}

fn water(units: DerivedUnits, temperature: f64) -> Result<Package, Box<dyn Error>> {
    let records = ComponentRecord::from_json(
        &["water"],
        "tests/nist/test_parameters.json",
        IdentifierOption::Name,
    )?;
    let mut model = Model::new();
    let root = model.root();
    let params = PropertyPackage::new(&mut model, root, "params", units)?;
    let water = params.add_component(&mut model, "water", &records[0].parameter_data, &PROPERTIES)?;
    let temperature = model.add_var(root, "temperature").value(temperature).build()?;
    Ok(Package {
        model,
        params,
        water,
        temperature,
    })
}

#[test]
fn test_shomate() -> Result<(), Box<dyn Error>> {
    let Package {
        model,
        params,
        water,
        temperature,
    } = water(DerivedUnits::default(), 500.0)?;
    let t = temperature.into();

    let cp = CpMolIgComp.return_expression(&model, &params, water, &t)?;
    let h = EnthMolIgComp.return_expression(&model, &params, water, &t)?;
    let s = EntrMolIgComp.return_expression(&model, &params, water, &t)?;
    let cp_value = model.value(&cp).unwrap();
    assert_relative_eq!(cp_value, 35.21836175, max_relative = 1e-10);
    assert_relative_eq!(model.value(&h).unwrap(), -2130.482107226726, max_relative = 1e-10);
    assert_relative_eq!(model.value(&s).unwrap(), 206.5340700842568, max_relative = 1e-10);

    // dh/dT = cp and ds/dT = cp/T
    let (_, dh) = model.derivative(&h, temperature).unwrap();
    assert_relative_eq!(dh, cp_value, max_relative = 1e-10);
    let (_, ds) = model.derivative(&s, temperature).unwrap();
    assert_relative_eq!(ds, cp_value / 500.0, max_relative = 1e-10);

    // at the reference temperature only the enthalpy of formation remains
    let t_ref = params.temperature_ref.into();
    let h_ref = EnthMolIgComp.return_expression(&model, &params, water, &t_ref)?;
    assert_relative_eq!(model.value(&h_ref).unwrap(), -9054.6, max_relative = 1e-10);
    Ok(())
}

#[test]
fn test_antoine() -> Result<(), Box<dyn Error>> {
    let Package {
        model,
        params,
        water,
        temperature,
    } = water(DerivedUnits::default(), 400.0)?;
    let t = temperature.into();

    let psat = PressureSatComp.return_expression(&model, &params, water, &t)?;
    let psat_value = model.value(&psat).unwrap();
    assert_relative_eq!(psat_value, 2.3552671512026837e5, max_relative = 1e-10);

    let dpsat = PressureSatComp.dt_expression(&model, &params, water, &t)?;
    assert_relative_eq!(
        model.value(&dpsat).unwrap(),
        0.08559609162640278e5,
        max_relative = 1e-10
    );
    let (_, dpsat_dt) = model.derivative(&psat, temperature).unwrap();
    assert_relative_eq!(model.value(&dpsat).unwrap(), dpsat_dt, max_relative = 1e-10);
    Ok(())
}

#[test]
fn test_derived_units() -> Result<(), Box<dyn Error>> {
    let units = DerivedUnits {
        temperature: KILO * KELVIN,
        pressure: BAR,
        energy_mole: KILO * JOULE / MOL,
        ..Default::default()
    };
    let Package {
        model,
        params,
        water,
        temperature,
    } = water(units, 0.4)?;
    let t = temperature.into();

    let psat = PressureSatComp.return_expression(&model, &params, water, &t)?;
    assert_relative_eq!(model.value(&psat).unwrap(), 2.3552671512026837, max_relative = 1e-10);
    // bar/kK
    let dpsat = PressureSatComp.dt_expression(&model, &params, water, &t)?;
    assert_relative_eq!(
        model.value(&dpsat).unwrap(),
        85.59609162640278,
        max_relative = 1e-10
    );
    let (_, dpsat_dt) = model.derivative(&psat, temperature).unwrap();
    assert_relative_eq!(model.value(&dpsat).unwrap(), dpsat_dt, max_relative = 1e-10);

    let h_ref = params.temperature_ref.into();
    let h = EnthMolIgComp.return_expression(&model, &params, water, &h_ref)?;
    assert_relative_eq!(model.value(&h).unwrap(), -9.0546, max_relative = 1e-10);
    Ok(())
}

#[test]
fn test_parameter_records() -> Result<(), Box<dyn Error>> {
    let records = ComponentRecord::from_json(
        &["CO2", "H2O"],
        "tests/nist/test_parameters.json",
        IdentifierOption::Formula,
    )?;
    assert_eq!(records[0].identifier.name.as_deref(), Some("carbon dioxide"));

    let mut model = Model::new();
    let root = model.root();
    let params = PropertyPackage::new(&mut model, root, "params", DerivedUnits::default())?;
    let co2 = params.add_component(
        &mut model,
        "carbon_dioxide",
        &records[0].parameter_data,
        &[&CpMolIgComp],
    )?;
    let cp = CpMolIgComp.return_expression(&model, &params, co2, &500.0.into())?;
    assert_relative_eq!(model.value(&cp).unwrap(), 44.614983875, max_relative = 1e-10);
    // parameters are fixed and never reported as badly scaled
    assert!(badly_scaled_variables(&model, root, 1e2, 1e-2, 1e-10).is_empty());

    // no Antoine parameters for carbon dioxide
    let err = params.add_component(
        &mut model,
        "co2",
        &records[0].parameter_data,
        &[&PressureSatComp],
    );
    assert!(matches!(err, Err(PseError::MissingParameters(_))));
    // parameters of a correlation that was not built
    let err = PressureSatComp.return_expression(&model, &params, co2, &500.0.into());
    assert!(matches!(err, Err(PseError::ComponentNotFound(..))));
    Ok(())
}
