//! Catalog - Column and table descriptors
//!
//! Builders are mutable, in-progress descriptors filled in while a DDL
//! statement is resolved; `create()` turns them into immutable descriptors.
//!
//! Length and scale are `Option`s on both sides: `None` means "unset" and is
//! distinct from an explicit zero.

pub mod table;
pub mod types;

pub use table::{Table, TableBuilder, TableId};
pub use types::StandardType;

/// Tri-state nullability of a column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullability {
    /// No NULL / NOT NULL decision observed
    #[default]
    Unspecified,
    /// Explicit NULL
    Nullable,
    /// Explicit NOT NULL (or implied by a key or SERIAL)
    NotNull,
}

impl Nullability {
    /// Nullability from a `[NOT] NULL` clause
    pub fn from_clause(not: bool) -> Self {
        if not {
            Nullability::NotNull
        } else {
            Nullability::Nullable
        }
    }

    pub fn is_specified(self) -> bool {
        self != Nullability::Unspecified
    }

    /// Whether NULL values are allowed; unspecified columns accept NULL
    pub fn is_optional(self) -> bool {
        self != Nullability::NotNull
    }
}

/// Immutable column descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// 1-based ordinal within the table (0 when not yet part of a table)
    pub position: usize,
    /// Canonical, upper-cased declared type (e.g. `BIGINT UNSIGNED`)
    pub type_name: String,
    /// Dialect-independent type tag
    pub standard_type: StandardType,
    pub length: Option<i32>,
    pub scale: Option<i32>,
    pub charset_name: Option<String>,
    /// Whether NULL values are allowed
    pub optional: bool,
    /// Carried a UNIQUE clause (or is SERIAL)
    pub unique: bool,
    pub auto_incremented: bool,
    pub generated: bool,
    /// Legal values of an ENUM or SET column, in declaration order
    pub enum_values: Vec<String>,
    pub comment: Option<String>,
    /// Default value expression (as string)
    pub default_value_expression: Option<String>,
    /// Whether a DEFAULT clause was present (`DEFAULT NULL` included)
    pub has_default_value: bool,
}

impl Column {
    /// Standard type code as an integer
    pub fn type_code(&self) -> i32 {
        self.standard_type.code()
    }
}

/// Mutable, in-progress column descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBuilder {
    name: String,
    type_name: String,
    standard_type: StandardType,
    length: Option<i32>,
    scale: Option<i32>,
    charset_name: Option<String>,
    nullable: Nullability,
    unique: bool,
    auto_incremented: bool,
    generated: bool,
    enum_values: Vec<String>,
    comment: Option<String>,
    default_value_expression: Option<String>,
    has_default_value: bool,
}

impl ColumnBuilder {
    /// Create a builder for the named column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: String::new(),
            standard_type: StandardType::Other,
            length: None,
            scale: None,
            charset_name: None,
            nullable: Nullability::Unspecified,
            unique: false,
            auto_incremented: false,
            generated: false,
            enum_values: Vec::new(),
            comment: None,
            default_value_expression: None,
            has_default_value: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn standard_type(&self) -> StandardType {
        self.standard_type
    }

    pub fn length(&self) -> Option<i32> {
        self.length
    }

    pub fn scale(&self) -> Option<i32> {
        self.scale
    }

    pub fn charset_name(&self) -> Option<&str> {
        self.charset_name.as_deref()
    }

    pub fn nullable(&self) -> Nullability {
        self.nullable
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_auto_incremented(&self) -> bool {
        self.auto_incremented
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn default_value_expression(&self) -> Option<&str> {
        self.default_value_expression.as_deref()
    }

    pub fn has_default_value(&self) -> bool {
        self.has_default_value
    }

    pub fn set_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.type_name = type_name.into();
        self
    }

    pub fn set_standard_type(&mut self, standard_type: StandardType) -> &mut Self {
        self.standard_type = standard_type;
        self
    }

    pub fn set_length(&mut self, length: i32) -> &mut Self {
        self.length = Some(length);
        self
    }

    pub fn set_scale(&mut self, scale: i32) -> &mut Self {
        self.scale = Some(scale);
        self
    }

    pub fn set_charset_name(&mut self, charset_name: Option<String>) -> &mut Self {
        self.charset_name = charset_name;
        self
    }

    pub fn set_nullable(&mut self, nullable: Nullability) -> &mut Self {
        self.nullable = nullable;
        self
    }

    pub fn set_unique(&mut self, unique: bool) -> &mut Self {
        self.unique = unique;
        self
    }

    pub fn set_auto_incremented(&mut self, auto_incremented: bool) -> &mut Self {
        self.auto_incremented = auto_incremented;
        self
    }

    pub fn set_generated(&mut self, generated: bool) -> &mut Self {
        self.generated = generated;
        self
    }

    pub fn set_enum_values(&mut self, values: Vec<String>) -> &mut Self {
        self.enum_values = values;
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    /// Record a DEFAULT clause; `None` is an explicit `DEFAULT NULL`
    pub fn set_default_value_expression(&mut self, expression: Option<String>) -> &mut Self {
        self.default_value_expression = expression;
        self.has_default_value = true;
        self
    }

    /// Build the immutable column
    pub fn create(&self) -> Column {
        Column {
            name: self.name.clone(),
            position: 0,
            type_name: self.type_name.clone(),
            standard_type: self.standard_type,
            length: self.length,
            scale: self.scale,
            charset_name: self.charset_name.clone(),
            optional: self.nullable.is_optional(),
            unique: self.unique,
            auto_incremented: self.auto_incremented,
            generated: self.generated,
            enum_values: self.enum_values.clone(),
            comment: self.comment.clone(),
            default_value_expression: self.default_value_expression.clone(),
            has_default_value: self.has_default_value,
        }
    }
}
