//! Pure-component property correlations.
//!
//! A correlation declares its parameters as fixed variables on the block of a
//! component and builds the property as an expression of a temperature.
use pse_core::parameter::ParameterData;
use pse_core::units::DerivedUnits;
use pse_core::{BlockId, Expr, Model, PseError, PseResult, VarId};
use quantity::KELVIN;

pub mod nist;

/// Reference temperature of enthalpies in K.
pub const TEMPERATURE_REF: f64 = 298.15;

/// A temperature dependent property of a pure component.
pub trait PureProperty {
    /// Declares the parameters on the component block `cobj` and fixes them
    /// at the values in `data`.
    fn build_parameters(
        &self,
        model: &mut Model,
        cobj: BlockId,
        data: &ParameterData,
    ) -> PseResult<()>;

    /// The property in the units of `package` for the temperature expression
    /// `t`, given in the temperature unit of `package`.
    fn return_expression(
        &self,
        model: &Model,
        package: &PropertyPackage,
        cobj: BlockId,
        t: &Expr,
    ) -> PseResult<Expr>;
}

/// Parameter block shared by the components of a property package.
#[derive(Clone, Copy)]
pub struct PropertyPackage {
    pub block: BlockId,
    /// Reference temperature in the temperature unit of the package.
    pub temperature_ref: VarId,
    pub units: DerivedUnits,
}

impl PropertyPackage {
    /// Declares the parameter block `name` below `parent`.
    pub fn new(
        model: &mut Model,
        parent: BlockId,
        name: &str,
        units: DerivedUnits,
    ) -> PseResult<Self> {
        let block = model.add_block(parent, name)?;
        let temperature_ref = model
            .add_var(block, "temperature_ref")
            .value((TEMPERATURE_REF * KELVIN).convert_into(units.temperature))
            .fixed(true)
            .doc("Reference temperature")
            .build()?;
        Ok(Self {
            block,
            temperature_ref,
            units,
        })
    }

    /// Declares the block of a component and builds the parameters of all
    /// `properties` on it.
    pub fn add_component(
        &self,
        model: &mut Model,
        name: &str,
        data: &ParameterData,
        properties: &[&dyn PureProperty],
    ) -> PseResult<BlockId> {
        let cobj = model.add_block(self.block, name)?;
        for property in properties {
            property.build_parameters(model, cobj, data)?;
        }
        Ok(cobj)
    }

    /// The component block `name` of this package.
    pub fn component(&self, model: &Model, name: &str) -> PseResult<BlockId> {
        model
            .block(self.block)
            .child(name)
            .ok_or_else(|| PseError::ComponentNotFound(model.block_name(self.block), name.into()))
    }
}

/// Expression of the parameter variable `{parameter}_{index}` of `cobj`.
pub(crate) fn parameter(
    model: &Model,
    cobj: BlockId,
    parameter: &str,
    index: &str,
) -> PseResult<Expr> {
    let name = format!("{parameter}_{index}");
    model
        .find_var(cobj, &name)
        .map(Expr::from)
        .ok_or_else(|| PseError::ComponentNotFound(model.block_name(cobj), name))
}
