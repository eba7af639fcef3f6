//! Standard (dialect-independent) type codes
//!
//! Codes follow the JDBC `java.sql.Types` numbering so that downstream
//! consumers can classify a column without knowing the source dialect.

use std::fmt;

/// Dialect-independent storage type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StandardType {
    Bit = -7,
    SmallInt = 5,
    Integer = 4,
    BigInt = -5,
    Float = 6,
    Real = 7,
    Double = 8,
    Numeric = 2,
    Decimal = 3,
    Char = 1,
    Varchar = 12,
    LongVarchar = -1,
    Date = 91,
    Time = 92,
    Timestamp = 93,
    TimestampWithTimezone = 2014,
    Binary = -2,
    Varbinary = -3,
    LongVarbinary = -4,
    Blob = 2004,
    Boolean = 16,
    NChar = -15,
    NVarchar = -9,
    Other = 1111,
}

impl StandardType {
    /// Integer code of this type
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Check if this is a national (fixed or varying) character type
    pub fn is_national(self) -> bool {
        matches!(self, StandardType::NChar | StandardType::NVarchar)
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
