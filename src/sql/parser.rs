//! Column definition reader on top of the sqlparser tokenizer
//!
//! Reads the text of one column definition (`name type [constraints...]`)
//! into a `ColumnDefinition` node. Table-level clauses are not recognized.

use sqlparser::dialect::MySqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::sql::ast::*;
use crate::sql::error::{DdlError, DdlResult};

/// Reads a single column definition
pub struct ColumnDefinitionReader {
    tokens: Vec<Token>,
    pos: usize,
}

impl ColumnDefinitionReader {
    /// Read `sql` into the column name and its definition node
    pub fn read(sql: &str) -> DdlResult<(String, ColumnDefinition)> {
        let dialect = MySqlDialect {};
        let tokens = Tokenizer::new(&dialect, sql).tokenize()?;
        let mut reader = Self { tokens, pos: 0 };

        let name = reader.identifier()?;
        let data_type = reader.data_type()?;

        let mut constraints = Vec::new();
        while !reader.at_end() {
            if reader.parse_keyword("CONSTRAINT") {
                // optional symbol before PRIMARY KEY / UNIQUE / CHECK
                if !matches!(
                    reader.peek_keyword().as_deref(),
                    Some("PRIMARY" | "UNIQUE" | "CHECK")
                ) {
                    reader.identifier()?;
                }
                continue;
            }
            constraints.push(reader.constraint()?);
        }

        Ok((
            name,
            ColumnDefinition {
                data_type,
                constraints,
            },
        ))
    }

    // ============ Token helpers ============

    fn skip_whitespace(&mut self) {
        while matches!(self.tokens.get(self.pos), Some(Token::Whitespace(_))) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        self.skip_whitespace();
        match self.tokens.get(self.pos) {
            Some(Token::EOF) | None => None,
            Some(token) => Some(token),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.peek().cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Upper-cased unquoted word at the cursor, without consuming it
    fn peek_keyword(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token::Word(w)) if w.quote_style.is_none() => Some(w.value.to_uppercase()),
            _ => None,
        }
    }

    fn parse_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword().as_deref() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> DdlResult<()> {
        if self.parse_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn keyword(&mut self) -> DdlResult<String> {
        match self.peek_keyword() {
            Some(keyword) => {
                self.pos += 1;
                Ok(keyword)
            }
            None => Err(self.unexpected("keyword")),
        }
    }

    fn consume(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> DdlResult<()> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn unexpected(&mut self, expected: &str) -> DdlError {
        match self.peek() {
            Some(found) => DdlError::Syntax(format!("Expected {}, found '{}'", expected, found)),
            None => DdlError::Syntax(format!("Expected {}, found end of input", expected)),
        }
    }

    fn identifier(&mut self) -> DdlResult<String> {
        match self.next_token() {
            Some(Token::Word(w)) => Ok(w.value),
            Some(found) => Err(DdlError::Syntax(format!(
                "Expected identifier, found '{}'",
                found
            ))),
            None => Err(DdlError::Syntax(
                "Expected identifier, found end of input".to_string(),
            )),
        }
    }

    /// Identifier or quoted string (charset and collation names)
    fn name(&mut self) -> DdlResult<String> {
        match self.peek() {
            Some(Token::SingleQuotedString(s)) | Some(Token::DoubleQuotedString(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => self.identifier(),
        }
    }

    fn decimal_literal(&mut self) -> DdlResult<DecimalLiteral> {
        match self.next_token() {
            Some(Token::Number(text, _)) => Ok(DecimalLiteral(text)),
            Some(found) => Err(DdlError::Syntax(format!(
                "Expected numeric literal, found '{}'",
                found
            ))),
            None => Err(DdlError::Syntax(
                "Expected numeric literal, found end of input".to_string(),
            )),
        }
    }

    // ============ Data types ============

    fn data_type(&mut self) -> DdlResult<DataTypeNode> {
        let keyword = self.keyword()?;

        let node = match keyword.as_str() {
            "NATIONAL" => {
                let type_name = self.keyword()?;
                let varying = matches!(type_name.as_str(), "CHAR" | "CHARACTER")
                    && self.parse_keyword("VARYING");
                if !matches!(type_name.as_str(), "CHAR" | "CHARACTER" | "VARCHAR") {
                    return Err(DdlError::Syntax(format!(
                        "Unexpected national type '{}'",
                        type_name
                    )));
                }
                let length = self.length_one_dimension()?;
                let binary = self.parse_keyword("BINARY");
                if varying {
                    DataTypeNode::NationalVaryingString(NationalVaryingStringDataType {
                        length,
                        binary,
                    })
                } else {
                    DataTypeNode::NationalString(NationalStringDataType {
                        type_name,
                        length,
                        binary,
                    })
                }
            }
            "NCHAR" if self.peek_keyword().as_deref() == Some("VARCHAR") => {
                self.pos += 1;
                let length = self.length_one_dimension()?;
                let binary = self.parse_keyword("BINARY");
                DataTypeNode::NationalString(NationalStringDataType {
                    type_name: "VARCHAR".to_string(),
                    length,
                    binary,
                })
            }
            "CHAR" | "CHARACTER" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT"
            | "LONGTEXT" | "NCHAR" | "NVARCHAR" => {
                let varying = matches!(keyword.as_str(), "CHAR" | "CHARACTER")
                    && self.parse_keyword("VARYING");
                let length = self.length_one_dimension()?;
                let binary = self.parse_keyword("BINARY");
                let (charset, collation) = self.charset_and_collation()?;
                DataTypeNode::String(StringDataType {
                    type_name: keyword,
                    varying,
                    length,
                    binary,
                    charset,
                    collation,
                })
            }
            "LONG" if self.parse_keyword("VARBINARY") => DataTypeNode::simple("LONG VARBINARY"),
            "LONG" => {
                self.parse_keyword("VARCHAR");
                let binary = self.parse_keyword("BINARY");
                let (charset, collation) = self.charset_and_collation()?;
                DataTypeNode::LongVarchar(LongVarcharDataType {
                    binary,
                    charset,
                    collation,
                })
            }
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "MIDDLEINT" | "INT" | "INTEGER" | "BIGINT"
            | "INT1" | "INT2" | "INT3" | "INT4" | "INT8" => {
                let dimension = self.length_one_dimension()?.map(Dimension::One);
                self.dimension_type(keyword, dimension)
            }
            "REAL" => {
                let dimension = self.length_two_dimension()?;
                self.dimension_type(keyword, dimension)
            }
            "DOUBLE" => {
                let type_name = if self.parse_keyword("PRECISION") {
                    "DOUBLE PRECISION".to_string()
                } else {
                    keyword
                };
                let dimension = self.length_two_dimension()?;
                self.dimension_type(type_name, dimension)
            }
            "DECIMAL" | "DEC" | "FIXED" | "NUMERIC" | "FLOAT" | "FLOAT4" | "FLOAT8" => {
                let dimension = self.length_two_optional_dimension()?;
                self.dimension_type(keyword, dimension)
            }
            "BIT" | "TIME" | "TIMESTAMP" | "DATETIME" | "BINARY" | "VARBINARY" | "BLOB"
            | "YEAR" => {
                let dimension = self.length_one_dimension()?.map(Dimension::One);
                DataTypeNode::Dimension(DimensionDataType {
                    type_name: keyword,
                    dimension,
                    modifiers: Vec::new(),
                })
            }
            "ENUM" | "SET" => {
                let options = self.collection_options()?;
                let binary = self.parse_keyword("BINARY");
                let charset = self.charset_definition()?;
                DataTypeNode::Collection(CollectionDataType {
                    type_name: keyword,
                    options,
                    binary,
                    charset,
                })
            }
            _ => DataTypeNode::Simple(SimpleDataType {
                type_name: keyword,
                modifiers: self.type_modifiers(),
            }),
        };
        Ok(node)
    }

    fn dimension_type(&mut self, type_name: String, dimension: Option<Dimension>) -> DataTypeNode {
        DataTypeNode::Dimension(DimensionDataType {
            type_name,
            dimension,
            modifiers: self.type_modifiers(),
        })
    }

    fn type_modifiers(&mut self) -> Vec<TypeModifier> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek_keyword().as_deref() {
                Some("SIGNED") => TypeModifier::Signed,
                Some("UNSIGNED") => TypeModifier::Unsigned,
                Some("ZEROFILL") => TypeModifier::Zerofill,
                _ => return modifiers,
            };
            self.pos += 1;
            modifiers.push(modifier);
        }
    }

    /// `(n)`
    fn length_one_dimension(&mut self) -> DdlResult<Option<DecimalLiteral>> {
        if !self.consume(&Token::LParen) {
            return Ok(None);
        }
        let length = self.decimal_literal()?;
        self.expect(&Token::RParen)?;
        Ok(Some(length))
    }

    /// `(m, d)`
    fn length_two_dimension(&mut self) -> DdlResult<Option<Dimension>> {
        if !self.consume(&Token::LParen) {
            return Ok(None);
        }
        let length = self.decimal_literal()?;
        self.expect(&Token::Comma)?;
        let scale = self.decimal_literal()?;
        self.expect(&Token::RParen)?;
        Ok(Some(Dimension::Two(length, scale)))
    }

    /// `(m[, d])`
    fn length_two_optional_dimension(&mut self) -> DdlResult<Option<Dimension>> {
        if !self.consume(&Token::LParen) {
            return Ok(None);
        }
        let length = self.decimal_literal()?;
        let scale = if self.consume(&Token::Comma) {
            Some(self.decimal_literal()?)
        } else {
            None
        };
        self.expect(&Token::RParen)?;
        Ok(Some(Dimension::TwoOptional(length, scale)))
    }

    fn collection_options(&mut self) -> DdlResult<Vec<String>> {
        self.expect(&Token::LParen)?;
        let mut options = Vec::new();
        loop {
            match self.next_token() {
                Some(Token::SingleQuotedString(s)) | Some(Token::DoubleQuotedString(s)) => {
                    options.push(s)
                }
                Some(found) => {
                    return Err(DdlError::Syntax(format!(
                        "Expected collection option, found '{}'",
                        found
                    )))
                }
                None => return Err(self.unexpected("collection option")),
            }
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(options)
    }

    /// `CHARACTER SET name`, `CHAR SET name` or `CHARSET name`
    fn charset_definition(&mut self) -> DdlResult<Option<String>> {
        let is_charset = match self.peek_keyword().as_deref() {
            Some("CHARSET") => {
                self.pos += 1;
                true
            }
            Some("CHARACTER") | Some("CHAR") => {
                self.pos += 1;
                self.expect_keyword("SET")?;
                true
            }
            _ => false,
        };
        if is_charset {
            Ok(Some(self.name()?))
        } else {
            Ok(None)
        }
    }

    fn charset_and_collation(&mut self) -> DdlResult<(Option<String>, Option<String>)> {
        let charset = self.charset_definition()?;
        let collation = if self.parse_keyword("COLLATE") {
            Some(self.name()?)
        } else {
            None
        };
        Ok((charset, collation))
    }

    // ============ Constraints ============

    fn constraint(&mut self) -> DdlResult<ColumnConstraint> {
        let keyword = self.keyword()?;
        let constraint = match keyword.as_str() {
            "NOT" => {
                self.expect_keyword("NULL")?;
                ColumnConstraint::Null { not: true }
            }
            "NULL" => ColumnConstraint::Null { not: false },
            "DEFAULT" => ColumnConstraint::Default(self.default_value()?),
            "AUTO_INCREMENT" => ColumnConstraint::AutoIncrement(AutoIncrementKind::AutoIncrement),
            "ON" => {
                self.expect_keyword("UPDATE")?;
                self.current_timestamp()?;
                ColumnConstraint::AutoIncrement(AutoIncrementKind::OnUpdateCurrentTimestamp)
            }
            "PRIMARY" => {
                self.expect_keyword("KEY")?;
                ColumnConstraint::PrimaryKey
            }
            "KEY" => ColumnConstraint::PrimaryKey,
            "UNIQUE" => {
                self.parse_keyword("KEY");
                ColumnConstraint::UniqueKey
            }
            "COMMENT" => match self.peek().cloned() {
                Some(Token::SingleQuotedString(s)) | Some(Token::DoubleQuotedString(s)) => {
                    self.pos += 1;
                    ColumnConstraint::Comment(Some(format!("'{}'", s)))
                }
                _ => return Err(self.unexpected("comment string")),
            },
            "SERIAL" => {
                self.expect_keyword("DEFAULT")?;
                self.expect_keyword("VALUE")?;
                ColumnConstraint::SerialDefault
            }
            "COLLATE" => ColumnConstraint::Collate(self.name()?),
            "CHECK" => {
                self.parenthesized()?;
                ColumnConstraint::Other(keyword)
            }
            "GENERATED" | "AS" => {
                if keyword == "GENERATED" {
                    self.expect_keyword("ALWAYS")?;
                    self.expect_keyword("AS")?;
                }
                self.parenthesized()?;
                for storage in ["VIRTUAL", "STORED", "PERSISTENT"] {
                    if self.parse_keyword(storage) {
                        break;
                    }
                }
                ColumnConstraint::Other("GENERATED".to_string())
            }
            "REFERENCES" => {
                // reference definitions run to the end of the column
                while self.next_token().is_some() {}
                ColumnConstraint::Other(keyword)
            }
            "COLUMN_FORMAT" | "STORAGE" => {
                self.keyword()?;
                ColumnConstraint::Other(keyword)
            }
            "VISIBLE" | "INVISIBLE" => ColumnConstraint::Other(keyword),
            _ => {
                return Err(DdlError::Syntax(format!(
                    "Unexpected column constraint '{}'",
                    keyword
                )))
            }
        };
        Ok(constraint)
    }

    fn default_value(&mut self) -> DdlResult<DefaultValue> {
        let value = match self.peek().cloned() {
            Some(Token::Minus) | Some(Token::Plus) => {
                let sign = if self.next_token() == Some(Token::Minus) { "-" } else { "" };
                let number = self.decimal_literal()?;
                DefaultValue::Literal(format!("{}{}", sign, number.text()))
            }
            Some(Token::Number(text, _)) => {
                self.pos += 1;
                DefaultValue::Literal(text)
            }
            Some(Token::SingleQuotedString(s))
            | Some(Token::DoubleQuotedString(s))
            | Some(Token::NationalStringLiteral(s)) => {
                self.pos += 1;
                DefaultValue::Literal(s)
            }
            // bit and hex literals keep their prefix
            Some(Token::SingleQuotedByteStringLiteral(s)) => {
                self.pos += 1;
                DefaultValue::Literal(format!("b'{}'", s))
            }
            Some(Token::HexStringLiteral(s)) => {
                self.pos += 1;
                DefaultValue::Literal(format!("x'{}'", s))
            }
            Some(Token::Word(w)) if w.quote_style.is_none() && w.value.starts_with('_') => {
                // charset introducer, e.g. _utf8mb4'abc'
                self.pos += 1;
                match self.next_token() {
                    Some(Token::SingleQuotedString(s)) | Some(Token::DoubleQuotedString(s)) => {
                        DefaultValue::Literal(s)
                    }
                    Some(Token::HexStringLiteral(s)) => DefaultValue::Literal(format!("x'{}'", s)),
                    Some(Token::SingleQuotedByteStringLiteral(s)) => {
                        DefaultValue::Literal(format!("b'{}'", s))
                    }
                    _ => {
                        return Err(DdlError::Syntax(format!(
                            "Expected string after charset introducer '{}'",
                            w.value
                        )))
                    }
                }
            }
            Some(Token::LParen) => DefaultValue::Expression(self.parenthesized()?),
            Some(Token::Word(w)) if w.quote_style.is_none() => {
                match w.value.to_uppercase().as_str() {
                    "NULL" => {
                        self.pos += 1;
                        DefaultValue::Null
                    }
                    "TRUE" | "FALSE" => {
                        self.pos += 1;
                        DefaultValue::Literal(w.value.to_uppercase())
                    }
                    "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIME" | "LOCALTIMESTAMP" => {
                        DefaultValue::CurrentTimestamp(self.current_timestamp()?)
                    }
                    _ => {
                        self.pos += 1;
                        DefaultValue::Expression(w.value)
                    }
                }
            }
            _ => return Err(self.unexpected("default value")),
        };
        Ok(value)
    }

    /// `CURRENT_TIMESTAMP[([n])]` and synonyms, returning the precision
    fn current_timestamp(&mut self) -> DdlResult<Option<u8>> {
        let keyword = self.keyword()?;
        if !matches!(
            keyword.as_str(),
            "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIME" | "LOCALTIMESTAMP"
        ) {
            return Err(DdlError::Syntax(format!(
                "Expected CURRENT_TIMESTAMP, found '{}'",
                keyword
            )));
        }
        if !self.consume(&Token::LParen) {
            return Ok(None);
        }
        if self.consume(&Token::RParen) {
            return Ok(None);
        }
        let precision = self.decimal_literal()?;
        self.expect(&Token::RParen)?;
        precision
            .text()
            .parse()
            .map(Some)
            .map_err(|_| DdlError::InvalidLiteral {
                position: "precision",
                literal: precision.text().to_string(),
            })
    }

    /// Consume a balanced parenthesized group, returning it as written
    fn parenthesized(&mut self) -> DdlResult<String> {
        self.expect(&Token::LParen)?;
        let mut text = String::from("(");
        let mut depth = 1usize;
        while depth > 0 {
            let token = match self.tokens.get(self.pos).cloned() {
                Some(Token::EOF) | None => return Err(self.unexpected(")")),
                Some(token) => token,
            };
            self.pos += 1;
            match token {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
            text.push_str(&token.to_string());
        }
        Ok(text)
    }
}
