use super::Component;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Direction in which the data of a suffix is exchanged with a solver.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuffixDirection {
    /// Data stays in the model.
    #[default]
    Local,
    /// Data is sent to the solver.
    Export,
    /// Data is received from the solver.
    Import,
    /// Data is sent to and received from the solver.
    ImportExport,
}

impl SuffixDirection {
    pub fn is_export(self) -> bool {
        matches!(self, Self::Export | Self::ImportExport)
    }

    pub fn is_import(self) -> bool {
        matches!(self, Self::Import | Self::ImportExport)
    }
}

/// Annotation store attached to a block, mapping model components to data.
///
/// Entries are kept in insertion order.
#[derive(Debug, Clone)]
pub struct Suffix<T> {
    direction: SuffixDirection,
    data: IndexMap<Component, T>,
}

impl<T> Suffix<T> {
    pub fn new(direction: SuffixDirection) -> Self {
        Self {
            direction,
            data: IndexMap::new(),
        }
    }

    pub fn direction(&self) -> SuffixDirection {
        self.direction
    }

    pub fn get<C: Into<Component>>(&self, component: C) -> Option<&T> {
        self.data.get(&component.into())
    }

    pub fn contains<C: Into<Component>>(&self, component: C) -> bool {
        self.data.contains_key(&component.into())
    }

    /// Inserts a value and returns the previous value for this component.
    pub fn insert<C: Into<Component>>(&mut self, component: C, value: T) -> Option<T> {
        self.data.insert(component.into(), value)
    }

    pub fn remove<C: Into<Component>>(&mut self, component: C) -> Option<T> {
        self.data.shift_remove(&component.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &T)> {
        self.data.iter().map(|(&c, v)| (c, v))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }
}

impl<T> Default for Suffix<T> {
    fn default() -> Self {
        Self::new(SuffixDirection::default())
    }
}
