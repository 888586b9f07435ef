//! Component parameter records and their transfer into models.
use crate::model::{BlockId, Model, VarId};
use crate::{PseError, PseResult};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

mod identifier;
pub use identifier::{Identifier, IdentifierOption};

/// Parameter values of a component, keyed by parameter name and index.
///
/// In JSON the data is a nested object, e.g.
/// `{"pressure_sat_comp_coeff": {"A": 3.55959, "B": 643.748, "C": -198.043}}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ParameterData(IndexMap<String, IndexMap<String, f64>>);

impl ParameterData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parameter: &str, index: &str, value: f64) {
        self.0
            .entry(parameter.into())
            .or_default()
            .insert(index.into(), value);
    }

    /// Returns the value of `parameter[index]`.
    pub fn get(&self, parameter: &str, index: &str) -> PseResult<f64> {
        self.0
            .get(parameter)
            .and_then(|p| p.get(index))
            .copied()
            .ok_or_else(|| PseError::MissingParameters(format!("{parameter}[{index}]")))
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.0.contains_key(parameter)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, &str, f64); N]> for ParameterData {
    fn from(values: [(&str, &str, f64); N]) -> Self {
        let mut data = Self::new();
        for (parameter, index, value) in values {
            data.insert(parameter, index, value);
        }
        data
    }
}

/// Identifier and parameter data of a single component.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ComponentRecord {
    pub identifier: Identifier,
    #[serde(default)]
    pub parameter_data: ParameterData,
}

impl ComponentRecord {
    pub fn new(identifier: Identifier, parameter_data: ParameterData) -> Self {
        Self {
            identifier,
            parameter_data,
        }
    }

    /// Reads the records of `substances` from a json file.
    ///
    /// The records are returned in the order of `substances`.
    pub fn from_json<P: AsRef<Path>>(
        substances: &[&str],
        file: P,
        identifier_option: IdentifierOption,
    ) -> PseResult<Vec<Self>> {
        let queried: IndexSet<&str> = substances.iter().copied().collect();
        if queried.len() != substances.len() {
            return Err(PseError::IncompatibleParameters(
                "A substance was defined more than once.".into(),
            ));
        }

        let reader = BufReader::new(File::open(file)?);
        let file_records: Vec<Self> = serde_json::from_reader(reader)?;
        let mut records: IndexMap<String, Self> = file_records
            .into_iter()
            .filter_map(|r| {
                let id = r.identifier.get(identifier_option)?.to_string();
                queried.contains(id.as_str()).then_some((id, r))
            })
            .collect();

        let missing: Vec<_> = queried
            .iter()
            .filter(|s| !records.contains_key(**s))
            .collect();
        if !missing.is_empty() {
            return Err(PseError::ComponentsNotFound(format!("{missing:?}")));
        }
        Ok(queried
            .iter()
            .filter_map(|s| records.shift_remove(*s))
            .collect())
    }
}

/// Fixes the parameter variable `{parameter}_{index}` declared on the
/// component block `cobj` at the value given in `data`.
pub fn set_param_value(
    model: &mut Model,
    cobj: BlockId,
    data: &ParameterData,
    parameter: &str,
    index: &str,
) -> PseResult<VarId> {
    let name = format!("{parameter}_{index}");
    let var = model
        .find_var(cobj, &name)
        .ok_or_else(|| PseError::ComponentNotFound(model.block_name(cobj), name))?;
    model.variable_mut(var).fix(data.get(parameter, index)?);
    Ok(var)
}
