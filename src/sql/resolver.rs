//! Column definition resolution
//!
//! The resolver listens to the walk of one column definition and fills in a
//! `ColumnBuilder`:
//! - Classifies the type node and derives length, scale and charset
//! - Applies constraint clauses (nullability, keys, auto-increment, comment)
//! - Scopes a `DefaultValueListener` to the definition when a table is built
//! - Promotes a UNIQUE column to primary key if the table has none

use crate::catalog::{Column, ColumnBuilder, Nullability, StandardType, TableBuilder};
use crate::sql::ast::{
    ColumnConstraint, ColumnDefinition, DataTypeNode, DecimalLiteral, Dimension, Node,
};
use crate::sql::datatype::DataType;
use crate::sql::ddl_parser::{DdlParser, Diagnostic};
use crate::sql::default_value::DefaultValueListener;
use crate::sql::error::{DdlError, DdlResult};
use crate::sql::parser::ColumnDefinitionReader;
use crate::sql::walker::{ParseTreeListener, ParseTreeWalker};

/// Length used when a two-optional dimension starts with a zero real literal
const DEFAULT_REAL_DIMENSION_LENGTH: i32 = 10;

/// Event-driven resolver for a single column definition
pub struct ColumnDefinitionResolver<'a> {
    parser: &'a mut DdlParser,
    table: Option<&'a mut TableBuilder>,
    column: ColumnBuilder,
    unique: bool,
    nullability: Nullability,
    default_value_listener: Option<DefaultValueListener>,
}

impl<'a> ColumnDefinitionResolver<'a> {
    /// Create a resolver; `table` is `None` when a column is parsed on its own
    pub fn new(
        parser: &'a mut DdlParser,
        table: Option<&'a mut TableBuilder>,
        column: ColumnBuilder,
    ) -> Self {
        Self {
            parser,
            table,
            column,
            unique: false,
            nullability: Nullability::Unspecified,
            default_value_listener: None,
        }
    }

    /// Replace the column being built (e.g. for the next definition)
    pub fn set_column_builder(&mut self, column: ColumnBuilder) {
        self.column = column;
    }

    pub fn column_builder(&self) -> &ColumnBuilder {
        &self.column
    }

    pub fn into_column_builder(self) -> ColumnBuilder {
        self.column
    }

    /// Build the column as resolved so far
    pub fn column(&self) -> Column {
        self.column.create()
    }

    /// Nullability observed in the current definition, not yet applied
    pub fn pending_nullability(&self) -> Nullability {
        self.nullability
    }

    /// Whether a default value listener is currently registered
    pub fn has_default_value_listener(&self) -> bool {
        self.default_value_listener.is_some()
    }

    fn enter_column_definition(&mut self, definition: &ColumnDefinition) -> DdlResult<()> {
        self.unique = false;
        self.nullability = Nullability::Unspecified;
        self.default_value_listener = None;

        self.resolve_column_data_type(&definition.data_type)?;

        if self.table.is_some() {
            self.default_value_listener = Some(DefaultValueListener::new());
        }
        Ok(())
    }

    fn exit_column_definition(&mut self) -> DdlResult<()> {
        if self.nullability.is_specified() {
            self.column.set_nullable(self.nullability);
        }
        self.column.set_unique(self.unique);

        // Deregister before flushing so an error cannot leak the listener
        if let Some(mut listener) = self.default_value_listener.take() {
            listener.flush(&mut self.column, self.nullability, true)?;
        }

        if self.unique {
            if let Some(table) = self.table.as_deref_mut() {
                // First UNIQUE column stands in for a missing primary key
                if !table.has_primary_key() {
                    tracing::debug!(
                        table = %table.table_id(),
                        column = self.column.name(),
                        "Promoting unique column to primary key"
                    );
                    table.add_column(self.column.create());
                    table.set_primary_key_names([self.column.name()]);
                }
            }
        }
        Ok(())
    }

    fn enter_constraint(&mut self, constraint: &ColumnConstraint) {
        match constraint {
            ColumnConstraint::UniqueKey => self.unique = true,
            ColumnConstraint::PrimaryKey => {
                self.nullability = Nullability::NotNull;
                self.column.set_nullable(Nullability::NotNull);
                if let Some(table) = self.table.as_deref_mut() {
                    table.add_column(self.column.create());
                    table.set_primary_key_names([self.column.name()]);
                }
            }
            ColumnConstraint::Comment(text) => {
                if !self.parser.skip_comments() {
                    if let Some(text) = text {
                        self.column.set_comment(DdlParser::without_quotes(text));
                    }
                }
            }
            ColumnConstraint::Null { not } => self.nullability = Nullability::from_clause(*not),
            ColumnConstraint::AutoIncrement(_) => {
                self.column.set_auto_incremented(true).set_generated(true);
            }
            ColumnConstraint::SerialDefault => self.serial_column(),
            ColumnConstraint::Default(_)
            | ColumnConstraint::Collate(_)
            | ColumnConstraint::Other(_) => {}
        }
    }

    /// SERIAL is an alias for BIGINT UNSIGNED NOT NULL AUTO_INCREMENT UNIQUE
    fn serial_column(&mut self) {
        if !self.nullability.is_specified() {
            self.nullability = Nullability::NotNull;
        }
        self.unique = true;
        self.column.set_auto_incremented(true).set_generated(true);
    }

    fn resolve_column_data_type(&mut self, node: &DataTypeNode) -> DdlResult<()> {
        let data_type = self.parser.data_type_resolver().resolve(node);
        let mut charset_name = None;

        match node {
            DataTypeNode::String(string) => {
                if let Some(length) = &string.length {
                    let length = self.parse_length(length.text())?;
                    self.column.set_length(length);
                }
                charset_name =
                    DdlParser::extract_charset(string.charset.as_deref(), string.collation.as_deref());
            }
            DataTypeNode::LongVarchar(long) => {
                charset_name =
                    DdlParser::extract_charset(long.charset.as_deref(), long.collation.as_deref());
            }
            DataTypeNode::NationalString(national) => {
                if let Some(length) = &national.length {
                    let length = self.parse_length(length.text())?;
                    self.column.set_length(length);
                }
            }
            DataTypeNode::NationalVaryingString(national) => {
                if let Some(length) = &national.length {
                    let length = self.parse_length(length.text())?;
                    self.column.set_length(length);
                }
            }
            DataTypeNode::Dimension(dimension) => {
                if let Some(dimension) = &dimension.dimension {
                    self.resolve_dimension(dimension)?;
                }
            }
            DataTypeNode::Collection(collection) => {
                charset_name = collection
                    .charset
                    .as_deref()
                    .map(|c| DdlParser::without_quotes(c).to_string());

                if data_type.name.eq_ignore_ascii_case("SET") {
                    // options plus separating commas
                    let options = i64::try_from(collection.options.len()).unwrap_or(i64::MAX);
                    let length = (options.saturating_mul(2) - 1).max(0);
                    self.column
                        .set_length(i32::try_from(length).unwrap_or(i32::MAX));
                } else if data_type.name.eq_ignore_ascii_case("ENUM") {
                    self.column.set_length(1);
                } else {
                    return Err(DdlError::UnexpectedCollectionType(data_type.name));
                }
            }
            DataTypeNode::Simple(_) => {}
        }

        self.apply_data_type(node, &data_type, charset_name);
        Ok(())
    }

    fn resolve_dimension(&mut self, dimension: &Dimension) -> DdlResult<()> {
        let (length, scale) = match dimension {
            Dimension::One(length) => (self.parse_length(length.text())?, None),
            Dimension::Two(length, scale) => (
                self.parse_length(length.text())?,
                Some(Self::parse_scale(scale)?),
            ),
            Dimension::TwoOptional(length, scale) => {
                let length = if length.is_real() {
                    let integer_part = length.text().split('.').next().unwrap_or_default();
                    if integer_part.trim_start_matches('0').is_empty() {
                        DEFAULT_REAL_DIMENSION_LENGTH
                    } else {
                        self.parse_length(integer_part)?
                    }
                } else {
                    self.parse_length(length.text())?
                };
                let scale = scale.as_ref().map(Self::parse_scale).transpose()?;
                (length, scale)
            }
        };

        self.column.set_length(length);
        if let Some(scale) = scale {
            self.column.set_scale(scale);
        }
        Ok(())
    }

    /// Universal post-processing shared by every type shape
    fn apply_data_type(
        &mut self,
        node: &DataTypeNode,
        data_type: &DataType,
        charset_name: Option<String>,
    ) {
        let type_name = data_type.name.to_uppercase();

        if type_name == "ENUM" || type_name == "SET" {
            // value conversion needs the legal values
            let values = match node {
                DataTypeNode::Collection(collection) => collection.options.clone(),
                _ => Vec::new(),
            };
            self.column.set_type(type_name).set_enum_values(values);
        } else if type_name == "SERIAL" {
            self.column.set_type("BIGINT UNSIGNED");
            self.serial_column();
        } else {
            self.column.set_type(type_name);
        }

        let standard_type = data_type.standard_type;
        self.column.set_standard_type(standard_type);

        if self.column.length().is_none() {
            if let Some(length) = data_type.default_length {
                self.column.set_length(length);
            }
        }
        if self.column.scale().is_none() {
            if let Some(scale) = data_type.default_scale {
                self.column.set_scale(scale);
            }
        }

        if standard_type.is_national() {
            self.column.set_charset_name(Some("utf8".to_string()));
            if standard_type == StandardType::NChar && self.column.length().is_none() {
                self.column.set_length(1);
            }
        } else {
            self.column.set_charset_name(charset_name);
        }
    }

    /// Parse a length literal, clamping values beyond `i32::MAX`
    fn parse_length(&mut self, text: &str) -> DdlResult<i32> {
        let invalid = || DdlError::InvalidLiteral {
            position: "length",
            literal: text.to_string(),
        };
        let length: i64 = text.trim().parse().map_err(|_| invalid())?;

        if length > i64::from(i32::MAX) {
            self.parser.report(Diagnostic::LengthClamped {
                table: self.table.as_deref().map(|t| t.table_id().clone()),
                column: self.column.name().to_string(),
                attempted: length,
                clamped: i32::MAX,
            });
            return Ok(i32::MAX);
        }
        i32::try_from(length).map_err(|_| invalid())
    }

    fn parse_scale(literal: &DecimalLiteral) -> DdlResult<i32> {
        literal
            .text()
            .trim()
            .parse()
            .map_err(|_| DdlError::InvalidLiteral {
                position: "scale",
                literal: literal.text().to_string(),
            })
    }
}

impl ParseTreeListener for ColumnDefinitionResolver<'_> {
    fn enter(&mut self, node: Node<'_>) -> DdlResult<()> {
        match node {
            Node::ColumnDefinition(definition) => self.enter_column_definition(definition),
            Node::DataType(_) => Ok(()),
            Node::Constraint(constraint) => {
                self.enter_constraint(constraint);
                Ok(())
            }
            Node::DefaultValue(value) => {
                if let Some(listener) = self.default_value_listener.as_mut() {
                    listener.enter_default_value(value);
                }
                Ok(())
            }
        }
    }

    fn exit(&mut self, node: Node<'_>) -> DdlResult<()> {
        match node {
            Node::ColumnDefinition(_) => self.exit_column_definition(),
            Node::DefaultValue(_) => match self.default_value_listener.as_mut() {
                Some(listener) => listener.flush(&mut self.column, self.nullability, false),
                None => Ok(()),
            },
            Node::DataType(_) | Node::Constraint(_) => Ok(()),
        }
    }
}

/// Resolve a column definition node and add the resulting column to `table`
///
/// A column already added under the same name (by a key clause) is replaced
/// by the final version, so each definition yields exactly one column. On
/// error `table` is restored to its state before the definition.
pub fn resolve_column_definition(
    parser: &mut DdlParser,
    mut table: Option<&mut TableBuilder>,
    name: &str,
    definition: &ColumnDefinition,
) -> DdlResult<Column> {
    let snapshot = table.as_deref().cloned();
    let walked = {
        let mut resolver =
            ColumnDefinitionResolver::new(parser, table.as_deref_mut(), ColumnBuilder::new(name));
        ParseTreeWalker::walk(definition, &mut resolver).map(|()| resolver.column())
    };

    let column = match walked {
        Ok(column) => column,
        Err(e) => {
            if let (Some(table), Some(snapshot)) = (table.as_deref_mut(), snapshot) {
                *table = snapshot;
            }
            return Err(e);
        }
    };

    match table {
        Some(table) => {
            table.add_column(column.clone());
            Ok(table.column(name).cloned().unwrap_or(column))
        }
        None => Ok(column),
    }
}

/// Read a column definition such as `price DECIMAL(10,2) NOT NULL` and resolve it
pub fn resolve_column(
    parser: &mut DdlParser,
    table: Option<&mut TableBuilder>,
    sql: &str,
) -> DdlResult<Column> {
    let (name, definition) = ColumnDefinitionReader::read(sql)?;
    resolve_column_definition(parser, table, &name, &definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableId;
    use crate::sql::ast::*;
    use crate::sql::ddl_parser::DdlParserConfig;

    fn table() -> TableBuilder {
        TableBuilder::new(TableId::parse("db.t"))
    }

    fn resolve(parser: &mut DdlParser, def: &ColumnDefinition) -> DdlResult<Column> {
        resolve_column_definition(parser, None, "c", def)
    }

    fn dimension(type_name: &str, dimension: Dimension) -> DataTypeNode {
        DataTypeNode::Dimension(DimensionDataType {
            type_name: type_name.to_string(),
            dimension: Some(dimension),
            modifiers: vec![],
        })
    }

    fn lit(text: &str) -> DecimalLiteral {
        DecimalLiteral::new(text)
    }

    #[test]
    fn test_two_optional_real_literal_zero_defaults_to_ten() {
        let mut parser = DdlParser::default();
        for text in ["0.5", ".5", "00.0"] {
            let def = ColumnDefinition::new(dimension(
                "DECIMAL",
                Dimension::TwoOptional(lit(text), None),
            ));
            let col = resolve(&mut parser, &def).unwrap();
            assert_eq!(col.length, Some(10), "literal {}", text);
            assert_eq!(col.scale, Some(0));
        }
    }

    #[test]
    fn test_two_optional_real_literal_uses_integer_part() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(dimension(
            "DECIMAL",
            Dimension::TwoOptional(lit("12.7"), Some(lit("3"))),
        ));
        let col = resolve(&mut parser, &def).unwrap();
        assert_eq!(col.length, Some(12));
        assert_eq!(col.scale, Some(3));
    }

    #[test]
    fn test_two_dimension() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(dimension(
            "DOUBLE",
            Dimension::Two(lit("8"), lit("3")),
        ));
        let col = resolve(&mut parser, &def).unwrap();
        assert_eq!(col.type_name, "DOUBLE");
        assert_eq!(col.length, Some(8));
        assert_eq!(col.scale, Some(3));
    }

    #[test]
    fn test_invalid_scale_literal_is_fatal() {
        let mut parser = DdlParser::default();
        let mut table = table();
        let def = ColumnDefinition::new(dimension(
            "DECIMAL",
            Dimension::TwoOptional(lit("10"), Some(lit("x"))),
        ))
        .constraint(ColumnConstraint::PrimaryKey);

        let result = resolve_column_definition(&mut parser, Some(&mut table), "c", &def);
        assert!(matches!(
            result,
            Err(DdlError::InvalidLiteral {
                position: "scale",
                ..
            })
        ));
        assert!(table.columns().is_empty());
        assert!(!table.has_primary_key());
    }

    #[test]
    fn test_unexpected_collection_type() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(DataTypeNode::Collection(CollectionDataType {
            type_name: "BAG".to_string(),
            options: vec!["a".to_string()],
            binary: false,
            charset: None,
        }));
        let result = resolve(&mut parser, &def);
        assert!(matches!(result, Err(DdlError::UnexpectedCollectionType(name)) if name == "BAG"));
    }

    #[test]
    fn test_empty_set_has_zero_length() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(DataTypeNode::Collection(CollectionDataType {
            type_name: "SET".to_string(),
            options: vec![],
            binary: false,
            charset: Some("latin1".to_string()),
        }));
        let col = resolve(&mut parser, &def).unwrap();
        assert_eq!(col.length, Some(0));
        assert_eq!(col.charset_name.as_deref(), Some("latin1"));
        assert!(col.enum_values.is_empty());
    }

    #[test]
    fn test_nullability_unspecified_until_exit() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(DataTypeNode::simple("DATE"))
            .constraint(ColumnConstraint::Null { not: false });

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, None, ColumnBuilder::new("d"));
        resolver.enter(Node::ColumnDefinition(&def)).unwrap();
        assert_eq!(resolver.pending_nullability(), Nullability::Unspecified);

        resolver.enter(Node::Constraint(&def.constraints[0])).unwrap();
        assert_eq!(resolver.pending_nullability(), Nullability::Nullable);
        assert_eq!(
            resolver.column_builder().nullable(),
            Nullability::Unspecified
        );

        resolver.exit(Node::ColumnDefinition(&def)).unwrap();
        assert_eq!(resolver.column_builder().nullable(), Nullability::Nullable);
    }

    #[test]
    fn test_listener_scoped_to_definition() {
        let mut parser = DdlParser::default();
        let mut table = table();
        let def = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::Default(DefaultValue::Literal("1".to_string())));

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, Some(&mut table), ColumnBuilder::new("n"));
        assert!(!resolver.has_default_value_listener());
        resolver.enter(Node::ColumnDefinition(&def)).unwrap();
        assert!(resolver.has_default_value_listener());
        resolver.exit(Node::ColumnDefinition(&def)).unwrap();
        assert!(!resolver.has_default_value_listener());
    }

    #[test]
    fn test_no_listener_without_table() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::Default(DefaultValue::Literal("1".to_string())));

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, None, ColumnBuilder::new("n"));
        resolver.enter(Node::ColumnDefinition(&def)).unwrap();
        assert!(!resolver.has_default_value_listener());
        ParseTreeWalker::walk(&def, &mut resolver).unwrap();
        assert!(!resolver.column_builder().has_default_value());
    }

    #[test]
    fn test_listener_deregistered_when_flush_fails() {
        let mut parser = DdlParser::default();
        let mut table = table();
        let def = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::Default(DefaultValue::Null))
            .constraint(ColumnConstraint::Null { not: true });

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, Some(&mut table), ColumnBuilder::new("n"));
        let result = ParseTreeWalker::walk(&def, &mut resolver);
        assert!(matches!(result, Err(DdlError::InvalidDefault { .. })));
        assert!(!resolver.has_default_value_listener());
    }

    #[test]
    fn test_failed_definition_restores_table() {
        let mut parser = DdlParser::default();
        let mut table = table();
        let first = ColumnDefinition::new(DataTypeNode::simple("INT"));
        resolve_column_definition(&mut parser, Some(&mut table), "a", &first).unwrap();

        // key clause adds the column before the default is rejected
        let keyed = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::PrimaryKey)
            .constraint(ColumnConstraint::Default(DefaultValue::Null));
        let result = resolve_column_definition(&mut parser, Some(&mut table), "id", &keyed);
        assert!(matches!(result, Err(DdlError::InvalidDefault { .. })));
        assert_eq!(table.columns().len(), 1);
        assert!(table.column("id").is_none());
        assert!(!table.has_primary_key());
    }

    #[test]
    fn test_promoted_column_carries_default() {
        let mut parser = DdlParser::default();
        let mut table = table();
        let def = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::UniqueKey)
            .constraint(ColumnConstraint::Default(DefaultValue::Literal("7".to_string())));

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, Some(&mut table), ColumnBuilder::new("u"));
        ParseTreeWalker::walk(&def, &mut resolver).unwrap();
        drop(resolver);

        assert_eq!(table.primary_key_names(), &["u".to_string()][..]);
        let u = table.column("u").unwrap();
        assert_eq!(u.default_value_expression.as_deref(), Some("7"));
    }

    #[test]
    fn test_comment_skipped_by_config() {
        let mut parser = DdlParser::new(DdlParserConfig {
            skip_comments: true,
        });
        let def = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::Comment(Some("'ignored'".to_string())));
        let col = resolve(&mut parser, &def).unwrap();
        assert_eq!(col.comment, None);

        let mut parser = DdlParser::default();
        let col = resolve(&mut parser, &def).unwrap();
        assert_eq!(col.comment.as_deref(), Some("ignored"));
    }

    #[test]
    fn test_on_update_marks_generated() {
        let mut parser = DdlParser::default();
        let def = ColumnDefinition::new(DataTypeNode::simple("TIMESTAMP")).constraint(
            ColumnConstraint::AutoIncrement(AutoIncrementKind::OnUpdateCurrentTimestamp),
        );
        let col = resolve(&mut parser, &def).unwrap();
        assert!(col.auto_incremented);
        assert!(col.generated);
    }

    #[test]
    fn test_set_column_builder_resets_transient_state() {
        let mut parser = DdlParser::default();
        let first = ColumnDefinition::new(DataTypeNode::simple("INT"))
            .constraint(ColumnConstraint::UniqueKey)
            .constraint(ColumnConstraint::Null { not: true });
        let second = ColumnDefinition::new(DataTypeNode::simple("INT"));

        let mut resolver =
            ColumnDefinitionResolver::new(&mut parser, None, ColumnBuilder::new("a"));
        ParseTreeWalker::walk(&first, &mut resolver).unwrap();
        assert!(resolver.column_builder().is_unique());

        resolver.set_column_builder(ColumnBuilder::new("b"));
        ParseTreeWalker::walk(&second, &mut resolver).unwrap();
        let col = resolver.into_column_builder();
        assert_eq!(col.name(), "b");
        assert!(!col.is_unique());
        assert_eq!(col.nullable(), Nullability::Unspecified);
    }
}
