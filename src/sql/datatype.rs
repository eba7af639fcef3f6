//! Data type resolution
//!
//! Maps a type node to its canonical name, standard type code and the
//! dialect's default length/scale for that type.

use crate::catalog::StandardType;
use crate::sql::ast::{DataTypeNode, TypeModifier};

/// Resolved data type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// Canonical, upper-cased name including sign modifiers
    pub name: String,
    pub standard_type: StandardType,
    pub default_length: Option<i32>,
    pub default_scale: Option<i32>,
}

/// Resolves type nodes to data types; must be pure and total
pub trait DataTypeResolver {
    fn resolve(&self, node: &DataTypeNode) -> DataType;
}

struct DataTypeEntry {
    name: &'static str,
    standard_type: StandardType,
    default_length: Option<i32>,
    default_scale: Option<i32>,
}

const fn entry(name: &'static str, standard_type: StandardType) -> DataTypeEntry {
    DataTypeEntry {
        name,
        standard_type,
        default_length: None,
        default_scale: None,
    }
}

const fn sized(name: &'static str, standard_type: StandardType, length: i32) -> DataTypeEntry {
    DataTypeEntry {
        name,
        standard_type,
        default_length: Some(length),
        default_scale: None,
    }
}

const fn scaled(
    name: &'static str,
    standard_type: StandardType,
    length: i32,
    scale: i32,
) -> DataTypeEntry {
    DataTypeEntry {
        name,
        standard_type,
        default_length: Some(length),
        default_scale: Some(scale),
    }
}

const ENTRIES: &[DataTypeEntry] = &[
    // Character strings
    sized("CHAR", StandardType::Char, 1),
    sized("CHARACTER", StandardType::Char, 1),
    entry("VARCHAR", StandardType::Varchar),
    entry("TINYTEXT", StandardType::Varchar),
    entry("TEXT", StandardType::Varchar),
    entry("MEDIUMTEXT", StandardType::Varchar),
    entry("LONGTEXT", StandardType::Varchar),
    entry("LONG VARCHAR", StandardType::LongVarchar),
    entry("NCHAR", StandardType::NChar),
    entry("NVARCHAR", StandardType::NVarchar),
    // Integers
    sized("BIT", StandardType::Bit, 1),
    entry("TINYINT", StandardType::SmallInt),
    entry("INT1", StandardType::SmallInt),
    entry("SMALLINT", StandardType::SmallInt),
    entry("INT2", StandardType::SmallInt),
    entry("MEDIUMINT", StandardType::Integer),
    entry("MIDDLEINT", StandardType::Integer),
    entry("INT3", StandardType::Integer),
    entry("INT", StandardType::Integer),
    entry("INTEGER", StandardType::Integer),
    entry("INT4", StandardType::Integer),
    entry("BIGINT", StandardType::BigInt),
    entry("INT8", StandardType::BigInt),
    entry("SERIAL", StandardType::BigInt),
    // Fractional
    entry("REAL", StandardType::Real),
    entry("DOUBLE", StandardType::Double),
    entry("DOUBLE PRECISION", StandardType::Double),
    entry("FLOAT8", StandardType::Double),
    entry("FLOAT", StandardType::Float),
    entry("FLOAT4", StandardType::Float),
    scaled("DECIMAL", StandardType::Decimal, 10, 0),
    scaled("DEC", StandardType::Decimal, 10, 0),
    scaled("FIXED", StandardType::Decimal, 10, 0),
    scaled("NUMERIC", StandardType::Numeric, 10, 0),
    // Temporal
    entry("DATE", StandardType::Date),
    entry("TIME", StandardType::Time),
    entry("TIMESTAMP", StandardType::TimestampWithTimezone),
    entry("DATETIME", StandardType::Timestamp),
    entry("YEAR", StandardType::Integer),
    // Binary
    sized("BINARY", StandardType::Binary, 1),
    entry("VARBINARY", StandardType::Varbinary),
    entry("LONG VARBINARY", StandardType::LongVarbinary),
    entry("TINYBLOB", StandardType::Blob),
    entry("BLOB", StandardType::Blob),
    entry("MEDIUMBLOB", StandardType::Blob),
    entry("LONGBLOB", StandardType::Blob),
    // Misc
    entry("BOOL", StandardType::Boolean),
    entry("BOOLEAN", StandardType::Boolean),
    entry("ENUM", StandardType::Char),
    entry("SET", StandardType::Char),
    entry("JSON", StandardType::Other),
    entry("GEOMETRY", StandardType::Other),
    entry("POINT", StandardType::Other),
    entry("LINESTRING", StandardType::Other),
    entry("POLYGON", StandardType::Other),
    entry("MULTIPOINT", StandardType::Other),
    entry("MULTILINESTRING", StandardType::Other),
    entry("MULTIPOLYGON", StandardType::Other),
    entry("GEOMETRYCOLLECTION", StandardType::Other),
];

const NO_MODIFIERS: &[TypeModifier] = &[];

/// Built-in resolver for the MySQL/MariaDB type grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDataTypeResolver;

impl MySqlDataTypeResolver {
    pub fn new() -> Self {
        MySqlDataTypeResolver
    }

    /// Base keyword used for the entry lookup, plus any modifiers to append
    fn base_name(node: &DataTypeNode) -> (String, &[TypeModifier]) {
        match node {
            DataTypeNode::String(s) if s.varying => ("VARCHAR".to_string(), NO_MODIFIERS),
            DataTypeNode::String(s) => (s.type_name.to_uppercase(), NO_MODIFIERS),
            DataTypeNode::LongVarchar(_) => ("LONG VARCHAR".to_string(), NO_MODIFIERS),
            DataTypeNode::NationalString(n) if n.type_name.eq_ignore_ascii_case("VARCHAR") => {
                ("NVARCHAR".to_string(), NO_MODIFIERS)
            }
            DataTypeNode::NationalString(_) => ("NCHAR".to_string(), NO_MODIFIERS),
            DataTypeNode::NationalVaryingString(_) => ("NVARCHAR".to_string(), NO_MODIFIERS),
            DataTypeNode::Dimension(d) => (d.type_name.to_uppercase(), d.modifiers.as_slice()),
            DataTypeNode::Collection(c) => (c.type_name.to_uppercase(), NO_MODIFIERS),
            DataTypeNode::Simple(s) => (s.type_name.to_uppercase(), s.modifiers.as_slice()),
        }
    }
}

impl DataTypeResolver for MySqlDataTypeResolver {
    fn resolve(&self, node: &DataTypeNode) -> DataType {
        let (base, modifiers) = Self::base_name(node);

        let mut name = base.clone();
        for modifier in modifiers {
            name.push(' ');
            name.push_str(modifier.keyword());
        }

        match ENTRIES.iter().find(|e| e.name == base) {
            Some(e) => DataType {
                name,
                standard_type: e.standard_type,
                default_length: e.default_length,
                default_scale: e.default_scale,
            },
            None => DataType {
                name,
                standard_type: StandardType::Other,
                default_length: None,
                default_scale: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::ast::*;

    fn resolve(node: DataTypeNode) -> DataType {
        MySqlDataTypeResolver::new().resolve(&node)
    }

    #[test]
    fn test_resolve_decimal_defaults() {
        let dt = resolve(DataTypeNode::Dimension(DimensionDataType {
            type_name: "decimal".to_string(),
            dimension: None,
            modifiers: vec![],
        }));
        assert_eq!(dt.name, "DECIMAL");
        assert_eq!(dt.standard_type, StandardType::Decimal);
        assert_eq!(dt.default_length, Some(10));
        assert_eq!(dt.default_scale, Some(0));
    }

    #[test]
    fn test_resolve_unsigned_name() {
        let dt = resolve(DataTypeNode::Dimension(DimensionDataType {
            type_name: "INT".to_string(),
            dimension: Some(Dimension::One(DecimalLiteral::new("11"))),
            modifiers: vec![TypeModifier::Unsigned, TypeModifier::Zerofill],
        }));
        assert_eq!(dt.name, "INT UNSIGNED ZEROFILL");
        assert_eq!(dt.standard_type, StandardType::Integer);
        assert_eq!(dt.default_length, None);
    }

    #[test]
    fn test_resolve_string_shapes() {
        let varying = resolve(DataTypeNode::String(StringDataType {
            type_name: "CHARACTER".to_string(),
            varying: true,
            length: None,
            binary: false,
            charset: None,
            collation: None,
        }));
        assert_eq!(varying.name, "VARCHAR");
        assert_eq!(varying.standard_type, StandardType::Varchar);

        let national = resolve(DataTypeNode::NationalString(NationalStringDataType {
            type_name: "CHARACTER".to_string(),
            length: None,
            binary: false,
        }));
        assert_eq!(national.name, "NCHAR");
        assert_eq!(national.standard_type, StandardType::NChar);

        let national_varchar = resolve(DataTypeNode::NationalString(NationalStringDataType {
            type_name: "VARCHAR".to_string(),
            length: None,
            binary: false,
        }));
        assert_eq!(national_varchar.standard_type, StandardType::NVarchar);

        let national_varying =
            resolve(DataTypeNode::NationalVaryingString(NationalVaryingStringDataType::default()));
        assert_eq!(national_varying.name, "NVARCHAR");
    }

    #[test]
    fn test_resolve_collections_and_serial() {
        let set = resolve(DataTypeNode::Collection(CollectionDataType {
            type_name: "set".to_string(),
            options: vec!["a".to_string()],
            binary: false,
            charset: None,
        }));
        assert_eq!(set.name, "SET");
        assert_eq!(set.standard_type, StandardType::Char);

        let serial = resolve(DataTypeNode::simple("SERIAL"));
        assert_eq!(serial.standard_type, StandardType::BigInt);
    }

    #[test]
    fn test_resolve_unknown_is_other() {
        let dt = resolve(DataTypeNode::simple("INET6"));
        assert_eq!(dt.name, "INET6");
        assert_eq!(dt.standard_type, StandardType::Other);
        assert_eq!(dt.default_length, None);
        assert_eq!(dt.default_scale, None);
    }
}
