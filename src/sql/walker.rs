//! Depth-first walk over a column definition
//!
//! Emits enter/exit notifications in document order. An error from the
//! listener stops the walk immediately.

use crate::sql::ast::{ColumnConstraint, ColumnDefinition, Node};
use crate::sql::error::DdlResult;

/// Receives enter/exit notifications for grammar nodes
pub trait ParseTreeListener {
    fn enter(&mut self, node: Node<'_>) -> DdlResult<()>;

    fn exit(&mut self, node: Node<'_>) -> DdlResult<()>;
}

/// Walks a column definition, driving a listener
pub struct ParseTreeWalker;

impl ParseTreeWalker {
    pub fn walk<L: ParseTreeListener + ?Sized>(
        definition: &ColumnDefinition,
        listener: &mut L,
    ) -> DdlResult<()> {
        listener.enter(Node::ColumnDefinition(definition))?;

        listener.enter(Node::DataType(&definition.data_type))?;
        listener.exit(Node::DataType(&definition.data_type))?;

        for constraint in &definition.constraints {
            listener.enter(Node::Constraint(constraint))?;
            if let ColumnConstraint::Default(value) = constraint {
                listener.enter(Node::DefaultValue(value))?;
                listener.exit(Node::DefaultValue(value))?;
            }
            listener.exit(Node::Constraint(constraint))?;
        }

        listener.exit(Node::ColumnDefinition(definition))
    }
}
