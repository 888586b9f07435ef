//! Correlations and parameter conventions of the NIST Chemistry WebBook
//! (<https://webbook.nist.gov/chemistry/>).
//!
//! Ideal gas properties use the Shomate equation with the reduced
//! temperature `t = T / 1000 K`, saturation pressures the Antoine equation
//! in bar and K.
use super::{parameter, PropertyPackage, PureProperty};
use pse_core::expression::ln;
use pse_core::parameter::{set_param_value, ParameterData};
use pse_core::{BlockId, Expr, Model, PseResult};
use quantity::{BAR, JOULE, KELVIN, KILO, MOL};
use std::f64::consts::LN_10;

const SHOMATE: &str = "cp_mol_ig_comp_coeff";
const ANTOINE: &str = "pressure_sat_comp_coeff";

/// Index, unit and description of the Shomate parameters.
const SHOMATE_PARAMETERS: [(&str, &str, &str); 8] = [
    ("A", "J/mol/K", "Shomate A parameter for ideal gas molar heat capacity"),
    ("B", "J/mol/K/kK", "Shomate B parameter for ideal gas molar heat capacity"),
    ("C", "J/mol/K/kK^2", "Shomate C parameter for ideal gas molar heat capacity"),
    ("D", "J/mol/K/kK^3", "Shomate D parameter for ideal gas molar heat capacity"),
    ("E", "J/mol/K*kK^2", "Shomate E parameter for ideal gas molar heat capacity"),
    ("F", "kJ/mol", "Shomate F parameter for ideal gas molar heat capacity"),
    ("G", "J/mol/K", "Shomate G parameter for ideal gas molar heat capacity"),
    ("H", "kJ/mol", "Shomate H parameter for ideal gas molar heat capacity"),
];

const ANTOINE_PARAMETERS: [(&str, &str, &str); 3] = [
    ("A", "", "Antoine A coefficient for calculating Psat"),
    ("B", "K", "Antoine B coefficient for calculating Psat"),
    ("C", "K", "Antoine C coefficient for calculating Psat"),
];

fn build(
    model: &mut Model,
    cobj: BlockId,
    data: &ParameterData,
    name: &str,
    parameters: &[(&str, &str, &str)],
) -> PseResult<()> {
    for &(index, units, doc) in parameters {
        let mut var = model.add_var(cobj, &format!("{name}_{index}")).doc(doc);
        if !units.is_empty() {
            var = var.units(units);
        }
        var.build()?;
        set_param_value(model, cobj, data, name, index)?;
    }
    Ok(())
}

/// Multiplies with a unit conversion factor unless it is 1.
fn convert(expr: Expr, factor: f64) -> Expr {
    if factor == 1.0 {
        expr
    } else {
        expr * factor
    }
}

/// Shomate parameters `A` to `H` of a component.
struct Shomate([Expr; 8]);

impl Shomate {
    fn new(model: &Model, cobj: BlockId) -> PseResult<Self> {
        let p = |i| parameter(model, cobj, SHOMATE, i);
        Ok(Self([
            p("A")?,
            p("B")?,
            p("C")?,
            p("D")?,
            p("E")?,
            p("F")?,
            p("G")?,
            p("H")?,
        ]))
    }
}

/// Temperature in kK.
fn kilo_kelvin(package: &PropertyPackage, t: &Expr) -> Expr {
    convert(t.clone(), package.units.temperature.convert_into(KILO * KELVIN))
}

/// Ideal gas molar isobaric heat capacity
/// `cp = A + B t + C t² + D t³ + E / t²`.
pub struct CpMolIgComp;

impl PureProperty for CpMolIgComp {
    fn build_parameters(
        &self,
        model: &mut Model,
        cobj: BlockId,
        data: &ParameterData,
    ) -> PseResult<()> {
        build(model, cobj, data, SHOMATE, &SHOMATE_PARAMETERS)
    }

    fn return_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr> {
        let Shomate([a, b, c, d, e, ..]) = Shomate::new(model, cobj)?;
        let t = kilo_kelvin(package, t);
        let cp = a + b * &t + c * t.clone().powi(2) + d * t.clone().powi(3) + e * t.powi(-2);
        let units = JOULE / MOL / KELVIN;
        Ok(convert(cp, units.convert_into(package.units.heat_capacity_mole)))
    }
}

/// Builds the Shomate parameters unless another ideal gas property of the
/// component already did.
fn build_shomate(model: &mut Model, cobj: BlockId, data: &ParameterData) -> PseResult<()> {
    if model.find_var(cobj, &format!("{SHOMATE}_A")).is_none() {
        CpMolIgComp.build_parameters(model, cobj, data)?;
    }
    Ok(())
}

/// Ideal gas molar enthalpy relative to the reference temperature of the
/// package, including the enthalpy of formation:
///
/// `h = A (t - tr) + B/2 (t² - tr²) + C/3 (t³ - tr³) + D/4 (t⁴ - tr⁴) - E (1/t - 1/tr) + F - H`
pub struct EnthMolIgComp;

impl PureProperty for EnthMolIgComp {
    fn build_parameters(
        &self,
        model: &mut Model,
        cobj: BlockId,
        data: &ParameterData,
    ) -> PseResult<()> {
        build_shomate(model, cobj, data)
    }

    fn return_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr> {
        let Shomate([a, b, c, d, e, f, _, h]) = Shomate::new(model, cobj)?;
        let t = kilo_kelvin(package, t);
        let tr = kilo_kelvin(package, &package.temperature_ref.into());
        let dt = |n: i32| t.clone().powi(n) - tr.clone().powi(n);
        let enth = a * (&t - &tr) + b / 2.0 * dt(2) + c / 3.0 * dt(3) + d / 4.0 * dt(4)
            - e * (1.0 / &t - 1.0 / &tr)
            + f
            - h;
        let units = KILO * JOULE / MOL;
        Ok(convert(enth, units.convert_into(package.units.energy_mole)))
    }
}

/// Ideal gas molar entropy
/// `s = A ln(t) + B t + C/2 t² + D/3 t³ - E / (2 t²) + G`.
pub struct EntrMolIgComp;

impl PureProperty for EntrMolIgComp {
    fn build_parameters(
        &self,
        model: &mut Model,
        cobj: BlockId,
        data: &ParameterData,
    ) -> PseResult<()> {
        build_shomate(model, cobj, data)
    }

    fn return_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr> {
        let Shomate([a, b, c, d, e, _, g, _]) = Shomate::new(model, cobj)?;
        let t = kilo_kelvin(package, t);
        let entr = a * ln(&t)
            + b * &t
            + c / 2.0 * t.clone().powi(2)
            + d / 3.0 * t.clone().powi(3)
            - e / 2.0 * t.powi(-2)
            + g;
        let units = JOULE / MOL / KELVIN;
        Ok(convert(entr, units.convert_into(package.units.entropy_mole)))
    }
}

/// Saturation pressure from the Antoine equation
/// `log10(psat / bar) = A - B / (T / K + C)`.
pub struct PressureSatComp;

impl PressureSatComp {
    /// Temperature derivative of the saturation pressure
    /// `dpsat/dT = psat B ln(10) / (T + C)²` in pressure per temperature
    /// units of the package.
    pub fn dt_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr> {
        let psat = self.return_expression(model, package, cobj, t)?;
        let b = parameter(model, cobj, ANTOINE, "B")?;
        let c = parameter(model, cobj, ANTOINE, "C")?;
        let t = convert(t.clone(), package.units.kelvin());
        let dpsat = psat * b * LN_10 / (t + c).powi(2);
        // 1/K into 1/(temperature unit)
        Ok(convert(dpsat, package.units.kelvin()))
    }
}

impl PureProperty for PressureSatComp {
    fn build_parameters(
        &self,
        model: &mut Model,
        cobj: BlockId,
        data: &ParameterData,
    ) -> PseResult<()> {
        build(model, cobj, data, ANTOINE, &ANTOINE_PARAMETERS)
    }

    fn return_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr> {
        let a = parameter(model, cobj, ANTOINE, "A")?;
        let b = parameter(model, cobj, ANTOINE, "B")?;
        let c = parameter(model, cobj, ANTOINE, "C")?;
        let t = convert(t.clone(), package.units.kelvin());
        let psat = Expr::constant(10.0).pow(a - b / (t + c));
        Ok(convert(psat, BAR.convert_into(package.units.pressure)))
    }
}
