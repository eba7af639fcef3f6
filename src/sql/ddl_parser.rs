//! DDL parser context
//!
//! Holds what outlives a single column definition: configuration, the data
//! type resolver, and the diagnostics recorded while resolving.

use std::fmt;

use crate::catalog::TableId;
use crate::sql::datatype::{DataTypeResolver, MySqlDataTypeResolver};

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct DdlParserConfig {
    /// Ignore COMMENT clauses on columns
    pub skip_comments: bool,
}

/// Non-fatal condition observed while resolving a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Length literal exceeded the representable range and was clamped
    LengthClamped {
        table: Option<TableId>,
        column: String,
        attempted: i64,
        clamped: i32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LengthClamped {
                table,
                column,
                attempted,
                clamped,
            } => {
                let table = table.as_ref().map(|t| t.to_string()).unwrap_or_default();
                write!(
                    f,
                    "The length '{}' of the column `{}`.`{}` is too large to be supported, truncating it to '{}'",
                    attempted, table, column, clamped
                )
            }
        }
    }
}

/// Shared state for resolving the column definitions of DDL statements
pub struct DdlParser {
    config: DdlParserConfig,
    data_type_resolver: Box<dyn DataTypeResolver>,
    diagnostics: Vec<Diagnostic>,
}

impl DdlParser {
    /// Create a parser with the built-in MySQL type resolver
    pub fn new(config: DdlParserConfig) -> Self {
        Self::with_resolver(config, Box::new(MySqlDataTypeResolver::new()))
    }

    /// Create a parser with a custom type resolver
    pub fn with_resolver(
        config: DdlParserConfig,
        data_type_resolver: Box<dyn DataTypeResolver>,
    ) -> Self {
        Self {
            config,
            data_type_resolver,
            diagnostics: Vec::new(),
        }
    }

    pub fn skip_comments(&self) -> bool {
        self.config.skip_comments
    }

    pub fn data_type_resolver(&self) -> &dyn DataTypeResolver {
        self.data_type_resolver.as_ref()
    }

    /// Record a non-fatal diagnostic and log it
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::LengthClamped {
                table,
                column,
                attempted,
                clamped,
            } => {
                let table = table.as_ref().map(|t| t.to_string()).unwrap_or_default();
                tracing::warn!(
                    component = "column_definition",
                    %table,
                    %column,
                    attempted,
                    clamped,
                    "Column length is too large to be supported, truncating"
                );
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain recorded diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Charset from an explicit charset clause, else from the collation prefix
    ///
    /// `utf8mb4_general_ci` yields `utf8mb4`; a collation without `_` yields none.
    pub fn extract_charset(charset: Option<&str>, collation: Option<&str>) -> Option<String> {
        if let Some(charset) = charset {
            return Some(Self::without_quotes(charset).to_string());
        }
        let collation = Self::without_quotes(collation?).to_lowercase();
        collation
            .find('_')
            .map(|idx| collation[..idx].to_string())
    }

    /// Strip one pair of matching quotes (`'`, `"` or `` ` ``)
    pub fn without_quotes(s: &str) -> &str {
        let bytes = s.as_bytes();
        if bytes.len() >= 2 {
            let first = bytes[0];
            if matches!(first, b'\'' | b'"' | b'`') && bytes[bytes.len() - 1] == first {
                return &s[1..s.len() - 1];
            }
        }
        s
    }
}

impl Default for DdlParser {
    fn default() -> Self {
        Self::new(DdlParserConfig::default())
    }
}

impl fmt::Debug for DdlParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdlParser")
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            DdlParser::extract_charset(Some("latin1"), Some("utf8_bin")),
            Some("latin1".to_string())
        );
        assert_eq!(
            DdlParser::extract_charset(Some("'utf8'"), None),
            Some("utf8".to_string())
        );
        assert_eq!(
            DdlParser::extract_charset(None, Some("UTF8MB4_General_CI")),
            Some("utf8mb4".to_string())
        );
        assert_eq!(DdlParser::extract_charset(None, Some("binary")), None);
        assert_eq!(DdlParser::extract_charset(None, None), None);
    }

    #[test]
    fn test_without_quotes() {
        assert_eq!(DdlParser::without_quotes("'abc'"), "abc");
        assert_eq!(DdlParser::without_quotes("\"abc\""), "abc");
        assert_eq!(DdlParser::without_quotes("`abc`"), "abc");
        assert_eq!(DdlParser::without_quotes("'abc"), "'abc");
        assert_eq!(DdlParser::without_quotes("'"), "'");
        assert_eq!(DdlParser::without_quotes(""), "");
    }

    #[test]
    fn test_diagnostics_recorded_and_drained() {
        let mut parser = DdlParser::default();
        assert!(!parser.skip_comments());

        parser.report(Diagnostic::LengthClamped {
            table: Some(TableId::parse("db.t")),
            column: "c".to_string(),
            attempted: 9_999_999_999,
            clamped: i32::MAX,
        });
        assert_eq!(parser.diagnostics().len(), 1);
        assert!(parser.diagnostics()[0].to_string().contains("`db.t`.`c`"));

        let drained = parser.take_diagnostics();
        assert_eq!(drained.len(), 1);
        assert!(parser.diagnostics().is_empty());
    }
}
