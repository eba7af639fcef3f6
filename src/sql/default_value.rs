//! DEFAULT clause listener
//!
//! Registered for the duration of one column definition. It records the
//! DEFAULT clause when its subtree is entered and writes it onto the column
//! on flush, together with the nullability decided so far.

use crate::catalog::{ColumnBuilder, Nullability};
use crate::sql::ast::DefaultValue;
use crate::sql::error::{DdlError, DdlResult};

#[derive(Debug, Default)]
pub struct DefaultValueListener {
    pending: Option<DefaultValue>,
    converted: bool,
}

impl DefaultValueListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// A DEFAULT subtree was entered; a later clause replaces an earlier one
    pub fn enter_default_value(&mut self, value: &DefaultValue) {
        self.pending = Some(value.clone());
        self.converted = false;
    }

    /// Whether a default is recorded but not yet written to the column
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Write the pending default and nullability onto `column`
    ///
    /// Without `force` nothing is written while nullability is still
    /// unspecified, since a later NOT NULL can invalidate `DEFAULT NULL`.
    /// Calling this with nothing pending is a no-op.
    pub fn flush(
        &mut self,
        column: &mut ColumnBuilder,
        nullability: Nullability,
        force: bool,
    ) -> DdlResult<()> {
        if self.converted {
            return Ok(());
        }
        if nullability.is_specified() {
            column.set_nullable(nullability);
        } else if !force {
            return Ok(());
        }

        let Some(value) = self.pending.take() else {
            return Ok(());
        };
        self.converted = true;

        let expression = match value {
            DefaultValue::Null => {
                if nullability == Nullability::NotNull {
                    return Err(DdlError::InvalidDefault {
                        column: column.name().to_string(),
                        reason: "NULL default on a NOT NULL column".to_string(),
                    });
                }
                None
            }
            DefaultValue::Literal(text) => Some(text),
            DefaultValue::CurrentTimestamp(None) => Some("CURRENT_TIMESTAMP".to_string()),
            DefaultValue::CurrentTimestamp(Some(precision)) => {
                Some(format!("CURRENT_TIMESTAMP({})", precision))
            }
            DefaultValue::Expression(text) => Some(text),
        };
        column.set_default_value_expression(expression);
        Ok(())
    }
}
