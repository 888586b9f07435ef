use serde::{Deserialize, Serialize};
use std::fmt;

/// Field of an [Identifier] used to look up a substance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierOption {
    Cas,
    #[default]
    Name,
    Formula,
    Smiles,
}

/// Identifiers of a pure component.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// CAS registry number
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    /// Component name as used in the flowsheet, e.g. `water`
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chemical formula
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// SMILES string
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

impl Identifier {
    pub fn new(
        cas: Option<&str>,
        name: Option<&str>,
        formula: Option<&str>,
        smiles: Option<&str>,
    ) -> Self {
        Self {
            cas: cas.map(Into::into),
            name: name.map(Into::into),
            formula: formula.map(Into::into),
            smiles: smiles.map(Into::into),
        }
    }

    pub fn get(&self, option: IdentifierOption) -> Option<&str> {
        match option {
            IdentifierOption::Cas => self.cas.as_deref(),
            IdentifierOption::Name => self.name.as_deref(),
            IdentifierOption::Formula => self.formula.as_deref(),
            IdentifierOption::Smiles => self.smiles.as_deref(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = [
            ("cas", &self.cas),
            ("name", &self.name),
            ("formula", &self.formula),
            ("smiles", &self.smiles),
        ]
        .into_iter()
        .filter_map(|(key, id)| id.as_ref().map(|id| format!("{key}={id}")))
        .collect();
        write!(f, "Identifier({})", ids.join(", "))
    }
}
