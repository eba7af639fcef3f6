//! Column-definition grammar nodes
//!
//! Each grammar shape a column definition can take is a closed variant, so
//! consumers match exhaustively instead of probing node kinds at runtime.

/// Numeric literal in a length/scale position, kept as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalLiteral(pub String);

impl DecimalLiteral {
    pub fn new(text: impl Into<String>) -> Self {
        DecimalLiteral(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Whether the literal was written with a decimal point (e.g. `10.5`)
    pub fn is_real(&self) -> bool {
        self.0.contains('.')
    }
}

/// Parenthesized dimension after a numeric or temporal type keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    /// `(n)`
    One(DecimalLiteral),
    /// `(m, d)`, both required
    Two(DecimalLiteral, DecimalLiteral),
    /// `(m[, d])`
    TwoOptional(DecimalLiteral, Option<DecimalLiteral>),
}

/// Sign and fill modifiers following a numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeModifier {
    Signed,
    Unsigned,
    Zerofill,
}

impl TypeModifier {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeModifier::Signed => "SIGNED",
            TypeModifier::Unsigned => "UNSIGNED",
            TypeModifier::Zerofill => "ZEROFILL",
        }
    }
}

/// `CHAR`, `VARCHAR`, `TEXT`, `NCHAR`, ... with optional length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringDataType {
    /// Type keyword, upper-cased
    pub type_name: String,
    /// `CHAR VARYING` / `CHARACTER VARYING`
    pub varying: bool,
    pub length: Option<DecimalLiteral>,
    pub binary: bool,
    pub charset: Option<String>,
    pub collation: Option<String>,
}

/// `LONG [VARCHAR]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LongVarcharDataType {
    pub binary: bool,
    pub charset: Option<String>,
    pub collation: Option<String>,
}

/// `NATIONAL CHAR(n)`, `NATIONAL VARCHAR(n)`, `NCHAR VARCHAR(n)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalStringDataType {
    /// Keyword after NATIONAL/NCHAR: `CHAR`, `CHARACTER` or `VARCHAR`
    pub type_name: String,
    pub length: Option<DecimalLiteral>,
    pub binary: bool,
}

/// `NATIONAL CHAR VARYING(n)`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NationalVaryingStringDataType {
    pub length: Option<DecimalLiteral>,
    pub binary: bool,
}

/// Numeric and temporal types with an optional dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionDataType {
    /// Type keyword, upper-cased (`DOUBLE PRECISION` kept as two words)
    pub type_name: String,
    pub dimension: Option<Dimension>,
    pub modifiers: Vec<TypeModifier>,
}

/// `ENUM(...)` / `SET(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDataType {
    pub type_name: String,
    /// Option literals, unquoted, in declaration order
    pub options: Vec<String>,
    pub binary: bool,
    pub charset: Option<String>,
}

/// Any other type (`DATE`, `JSON`, `SERIAL`, spatial types, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleDataType {
    pub type_name: String,
    pub modifiers: Vec<TypeModifier>,
}

/// Grammar shape of a column's data type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTypeNode {
    String(StringDataType),
    LongVarchar(LongVarcharDataType),
    NationalString(NationalStringDataType),
    NationalVaryingString(NationalVaryingStringDataType),
    Dimension(DimensionDataType),
    Collection(CollectionDataType),
    Simple(SimpleDataType),
}

impl DataTypeNode {
    /// Shorthand for a type without a dimension or options
    pub fn simple(type_name: impl Into<String>) -> Self {
        DataTypeNode::Simple(SimpleDataType {
            type_name: type_name.into(),
            modifiers: Vec::new(),
        })
    }
}

/// Right-hand side of a DEFAULT clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String, numeric, boolean or bit literal (sign folded in)
    Literal(String),
    /// `DEFAULT NULL`
    Null,
    /// `CURRENT_TIMESTAMP`, `NOW()`, `LOCALTIME`, ... with optional precision
    CurrentTimestamp(Option<u8>),
    /// Parenthesized expression, kept as written
    Expression(String),
}

/// What an auto-increment clause was written as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrementKind {
    AutoIncrement,
    OnUpdateCurrentTimestamp,
}

/// Constraint clause inside a column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnConstraint {
    /// `NULL` / `NOT NULL`
    Null { not: bool },
    /// `DEFAULT ...`
    Default(DefaultValue),
    /// `AUTO_INCREMENT` / `ON UPDATE CURRENT_TIMESTAMP`
    AutoIncrement(AutoIncrementKind),
    /// `[PRIMARY] KEY`
    PrimaryKey,
    /// `UNIQUE [KEY]`
    UniqueKey,
    /// `COMMENT 'text'` (literal still quoted)
    Comment(Option<String>),
    /// `SERIAL DEFAULT VALUE`
    SerialDefault,
    /// `COLLATE name`
    Collate(String),
    /// Anything else (`REFERENCES`, `CHECK`, `STORAGE`, ...), keyword kept
    Other(String),
}

/// One column definition: type followed by constraint clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub data_type: DataTypeNode,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(data_type: DataTypeNode) -> Self {
        Self {
            data_type,
            constraints: Vec::new(),
        }
    }

    /// Add a constraint clause
    #[must_use]
    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Borrowed view of a node, as delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    ColumnDefinition(&'a ColumnDefinition),
    DataType(&'a DataTypeNode),
    Constraint(&'a ColumnConstraint),
    DefaultValue(&'a DefaultValue),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_literal_real() {
        assert!(DecimalLiteral::new("10.5").is_real());
        assert!(DecimalLiteral::new(".5").is_real());
        assert!(!DecimalLiteral::new("10").is_real());
        assert_eq!(DecimalLiteral::new("7").text(), "7");
    }

    #[test]
    fn test_column_definition_builder() {
        let def = ColumnDefinition::new(DataTypeNode::simple("DATE"))
            .constraint(ColumnConstraint::Null { not: true })
            .constraint(ColumnConstraint::UniqueKey);
        assert_eq!(def.constraints.len(), 2);
        assert!(matches!(def.data_type, DataTypeNode::Simple(_)));
    }
}
