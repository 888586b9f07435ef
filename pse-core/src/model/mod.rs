//! Arena based container for hierarchical algebraic models.
//!
//! All blocks, variables, constraints and named expressions of a [Model] are
//! stored in flat arenas and referenced by copyable handles. The parent block
//! exclusively owns its children and components; the traversal order is the
//! declaration order.
use crate::expression::{Expr, ExprDisplay};
use crate::{PseError, PseResult};
use std::fmt;

mod block;
mod component;
mod evaluation;
mod suffix;

pub use block::Block;
pub use component::{Constraint, NamedExpression, Relation, VarBuilder, Variable};
pub use evaluation::AttributeSubstitution;
pub use suffix::{Suffix, SuffixDirection};

macro_rules! impl_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position of the entity in the arena of its model.
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

impl_id!(
    /// Handle of a block.
    BlockId
);
impl_id!(
    /// Handle of a variable.
    VarId
);
impl_id!(
    /// Handle of a constraint.
    ConstraintId
);
impl_id!(
    /// Handle of a named expression.
    ExpressionId
);

/// Any model component that can carry annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Var(VarId),
    Constraint(ConstraintId),
    Expression(ExpressionId),
}

impl From<VarId> for Component {
    fn from(var: VarId) -> Self {
        Self::Var(var)
    }
}

impl From<ConstraintId> for Component {
    fn from(constraint: ConstraintId) -> Self {
        Self::Constraint(constraint)
    }
}

impl From<ExpressionId> for Component {
    fn from(expr: ExpressionId) -> Self {
        Self::Expression(expr)
    }
}

/// A block-structured algebraic model.
#[derive(Debug, Clone)]
pub struct Model {
    blocks: Vec<Block>,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    expressions: Vec<NamedExpression>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an empty model consisting of a root block.
    pub fn new() -> Self {
        Self::with_name("model")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            blocks: vec![Block::new(name.into(), None)],
            variables: Vec::new(),
            constraints: Vec::new(),
            expressions: Vec::new(),
        }
    }

    pub fn root(&self) -> BlockId {
        BlockId(0)
    }

    /// Fails if `block` was not created by this model.
    pub fn check_block(&self, block: BlockId) -> PseResult<()> {
        if block.0 < self.blocks.len() {
            Ok(())
        } else {
            Err(PseError::Error(format!(
                "Block handle {} is not part of model `{}`.",
                block.0,
                self.blocks[0].name()
            )))
        }
    }

    /// # Panics
    ///
    /// Panics if `block` was created by another model. The same holds for
    /// all accessors taking a handle.
    pub fn block(&self, block: BlockId) -> &Block {
        &self.blocks[block.0]
    }

    pub fn block_mut(&mut self, block: BlockId) -> &mut Block {
        &mut self.blocks[block.0]
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.0]
    }

    pub fn variable_mut(&mut self, var: VarId) -> &mut Variable {
        &mut self.variables[var.0]
    }

    pub fn constraint(&self, constraint: ConstraintId) -> &Constraint {
        &self.constraints[constraint.0]
    }

    pub fn expression(&self, expr: ExpressionId) -> &NamedExpression {
        &self.expressions[expr.0]
    }

    fn check_name(&self, block: BlockId, name: &str) -> PseResult<()> {
        if self.block(block).contains_name(name) {
            return Err(PseError::DuplicateComponent(
                self.block_name(block),
                name.into(),
            ));
        }
        Ok(())
    }

    /// Declares a sub-block.
    pub fn add_block(&mut self, parent: BlockId, name: &str) -> PseResult<BlockId> {
        self.check_name(parent, name)?;
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(name.into(), Some(parent)));
        self.block_mut(parent).children.insert(name.into(), id);
        Ok(id)
    }

    /// Starts the declaration of a variable on `block`.
    pub fn add_var(&mut self, block: BlockId, name: &str) -> VarBuilder<'_> {
        VarBuilder::new(self, block, name.into())
    }

    pub(crate) fn push_variable(&mut self, var: Variable) -> PseResult<VarId> {
        self.check_name(var.parent, &var.name)?;
        let id = VarId(self.variables.len());
        self.block_mut(var.parent)
            .components
            .insert(var.name.clone(), Component::Var(id));
        self.variables.push(var);
        Ok(id)
    }

    /// Declares a constraint on `block`.
    pub fn add_constraint(
        &mut self,
        block: BlockId,
        name: &str,
        relation: Relation,
    ) -> PseResult<ConstraintId> {
        self.check_name(block, name)?;
        let id = ConstraintId(self.constraints.len());
        self.block_mut(block)
            .components
            .insert(name.into(), Component::Constraint(id));
        self.constraints
            .push(Constraint::new(name.into(), block, relation));
        Ok(id)
    }

    /// Declares a named expression on `block`.
    ///
    /// Named expressions can only refer to named expressions that already
    /// exist, so the expression graph is acyclic.
    pub fn add_expression<E: Into<Expr>>(
        &mut self,
        block: BlockId,
        name: &str,
        expr: E,
    ) -> PseResult<ExpressionId> {
        self.check_name(block, name)?;
        let id = ExpressionId(self.expressions.len());
        self.block_mut(block)
            .components
            .insert(name.into(), Component::Expression(id));
        self.expressions
            .push(NamedExpression::new(name.into(), block, expr.into()));
        Ok(id)
    }

    /// The block that declares `component`.
    pub fn parent_block<C: Into<Component>>(&self, component: C) -> BlockId {
        match component.into() {
            Component::Var(v) => self.variable(v).parent,
            Component::Constraint(c) => self.constraint(c).parent,
            Component::Expression(e) => self.expression(e).parent,
        }
    }

    pub fn local_name<C: Into<Component>>(&self, component: C) -> &str {
        match component.into() {
            Component::Var(v) => &self.variable(v).name,
            Component::Constraint(c) => &self.constraint(c).name,
            Component::Expression(e) => &self.expression(e).name,
        }
    }

    /// Dotted path of a block. The root block is only named when it is
    /// requested itself.
    pub fn block_name(&self, block: BlockId) -> String {
        let mut names = Vec::new();
        let mut current = block;
        while let Some(parent) = self.block(current).parent {
            names.push(self.block(current).name.as_str());
            current = parent;
        }
        if names.is_empty() {
            return self.block(block).name.clone();
        }
        names.reverse();
        names.join(".")
    }

    /// Fully qualified name of a component, e.g. `b1.c1`.
    pub fn name<C: Into<Component>>(&self, component: C) -> String {
        let component = component.into();
        let parent = self.parent_block(component);
        let local = self.local_name(component);
        if parent == self.root() {
            local.into()
        } else {
            format!("{}.{}", self.block_name(parent), local)
        }
    }

    /// Looks up a component declared directly on `block`.
    pub fn find(&self, block: BlockId, name: &str) -> Option<Component> {
        self.block(block).component(name)
    }

    pub fn find_var(&self, block: BlockId, name: &str) -> Option<VarId> {
        match self.find(block, name)? {
            Component::Var(v) => Some(v),
            _ => None,
        }
    }

    /// All blocks of the subtree rooted at `root` in depth-first pre-order.
    ///
    /// Siblings are visited in declaration order.
    pub fn blocks(&self, root: BlockId) -> Vec<BlockId> {
        let mut blocks = Vec::new();
        let mut stack = vec![root];
        while let Some(block) = stack.pop() {
            blocks.push(block);
            stack.extend(self.block(block).children.values().rev());
        }
        blocks
    }

    /// All components declared in the subtree rooted at `root`.
    pub fn components(&self, root: BlockId) -> impl Iterator<Item = Component> + '_ {
        self.blocks(root)
            .into_iter()
            .flat_map(move |b| self.block(b).components())
    }

    /// Scaling factor of `component` from the store of its own block.
    pub fn scaling_factor<C: Into<Component>>(&self, component: C) -> Option<f64> {
        let component = component.into();
        self.block(self.parent_block(component))
            .scaling_factor()?
            .get(component)
            .copied()
    }

    /// Writes the scaling factor of `component` into the store of its own block.
    pub fn set_scaling_factor<C: Into<Component>>(&mut self, component: C, value: f64) {
        let component = component.into();
        let block = self.parent_block(component);
        self.block_mut(block)
            .scaling_factor_mut()
            .insert(component, value);
    }

    /// Scaling expression of `component` from the store of its own block.
    ///
    /// Stores of other blocks are not consulted.
    pub fn scaling_expression<C: Into<Component>>(&self, component: C) -> Option<&Expr> {
        let component = component.into();
        self.block(self.parent_block(component))
            .scaling_expression()?
            .get(component)
    }

    /// Writes the scaling expression of `component` into the store of its own block.
    pub fn set_scaling_expression<C: Into<Component>, E: Into<Expr>>(
        &mut self,
        component: C,
        expr: E,
    ) {
        let component = component.into();
        let block = self.parent_block(component);
        self.block_mut(block)
            .scaling_expression_mut()
            .insert(component, expr.into());
    }

    /// Displays an expression with fully qualified names.
    pub fn display<'a>(&'a self, expr: &'a Expr) -> ExprDisplay<'a> {
        ExprDisplay::new(self, expr)
    }

    fn fmt_block(&self, f: &mut fmt::Formatter<'_>, block: BlockId, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        writeln!(f, "{indent}Block {}", self.block_name(block))?;
        for component in self.block(block).components() {
            match component {
                Component::Var(v) => writeln!(f, "{indent}    Var {}", self.variable(v))?,
                Component::Constraint(c) => {
                    let relation = self.constraint(c).relation();
                    let lower = relation.lower.map_or("-inf".into(), |x| x.to_string());
                    let upper = relation.upper.map_or("inf".into(), |x| x.to_string());
                    writeln!(
                        f,
                        "{indent}    Constraint {}: {lower} <= {} <= {upper}",
                        self.local_name(c),
                        self.display(&relation.body),
                    )?
                }
                Component::Expression(e) => writeln!(
                    f,
                    "{indent}    Expression {}: {}",
                    self.local_name(e),
                    self.display(self.expression(e).expr())
                )?,
            }
        }
        for child in self.block(block).children() {
            self.fmt_block(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_block(f, self.root(), 0)
    }
}
