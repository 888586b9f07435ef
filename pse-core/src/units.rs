//! Units of measurement of a property package.
use quantity::{MolarEnergy, MolarEntropy, Pressure, Temperature, JOULE, KELVIN, MOL, PASCAL};

/// The units in which a property package expresses its quantities.
///
/// Expressions returned by property correlations are in these units, and
/// temperature arguments are expected in `temperature`.
#[derive(Clone, Copy)]
pub struct DerivedUnits {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub energy_mole: MolarEnergy,
    pub entropy_mole: MolarEntropy,
    pub heat_capacity_mole: MolarEntropy,
}

impl Default for DerivedUnits {
    fn default() -> Self {
        Self {
            temperature: KELVIN,
            pressure: PASCAL,
            energy_mole: JOULE / MOL,
            entropy_mole: JOULE / MOL / KELVIN,
            heat_capacity_mole: JOULE / MOL / KELVIN,
        }
    }
}

impl DerivedUnits {
    /// Conversion factor from package temperatures to kelvin.
    pub fn kelvin(&self) -> f64 {
        self.temperature.convert_into(KELVIN)
    }
}
