use super::{BlockId, Component, Suffix, SuffixDirection};
use crate::expression::Expr;
use indexmap::IndexMap;

/// A node in the model tree.
///
/// A block owns the components declared directly on it, its sub-blocks and
/// two annotation stores: numeric scaling factors and symbolic scaling
/// expressions. Both stores are created on first write.
#[derive(Debug, Clone)]
pub struct Block {
    pub(super) name: String,
    pub(super) parent: Option<BlockId>,
    pub(super) children: IndexMap<String, BlockId>,
    pub(super) components: IndexMap<String, Component>,
    scaling_factor: Option<Suffix<f64>>,
    scaling_expression: Option<Suffix<Expr>>,
}

impl Block {
    pub(super) fn new(name: String, parent: Option<BlockId>) -> Self {
        Self {
            name,
            parent,
            children: IndexMap::new(),
            components: IndexMap::new(),
            scaling_factor: None,
            scaling_expression: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    /// Sub-blocks in declaration order.
    pub fn children(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.children.values().copied()
    }

    /// Components declared directly on this block in declaration order.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.components.values().copied()
    }

    /// Looks up a component or sub-block by its local name.
    pub fn component(&self, name: &str) -> Option<Component> {
        self.components.get(name).copied()
    }

    pub fn child(&self, name: &str) -> Option<BlockId> {
        self.children.get(name).copied()
    }

    pub(super) fn contains_name(&self, name: &str) -> bool {
        self.components.contains_key(name) || self.children.contains_key(name)
    }

    pub fn scaling_factor(&self) -> Option<&Suffix<f64>> {
        self.scaling_factor.as_ref()
    }

    /// The scaling factor store, created with export direction if necessary.
    pub fn scaling_factor_mut(&mut self) -> &mut Suffix<f64> {
        self.scaling_factor
            .get_or_insert_with(|| Suffix::new(SuffixDirection::Export))
    }

    pub fn scaling_expression(&self) -> Option<&Suffix<Expr>> {
        self.scaling_expression.as_ref()
    }

    /// The scaling expression store, created with local direction if necessary.
    pub fn scaling_expression_mut(&mut self) -> &mut Suffix<Expr> {
        self.scaling_expression
            .get_or_insert_with(|| Suffix::new(SuffixDirection::Local))
    }
}
