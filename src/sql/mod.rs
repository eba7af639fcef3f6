//! SQL layer - column definition resolution
//!
//! This module provides:
//! - `ColumnDefinitionReader`: Reads column definition text into grammar nodes
//! - `ParseTreeWalker`: Drives enter/exit events over a definition
//! - `ColumnDefinitionResolver`: Turns those events into a column descriptor
//! - `DataTypeResolver`: Maps type nodes to standard types and defaults

pub mod ast;
pub mod datatype;
pub mod ddl_parser;
pub mod default_value;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod walker;

pub use ast::*;
pub use datatype::{DataType, DataTypeResolver, MySqlDataTypeResolver};
pub use ddl_parser::{DdlParser, DdlParserConfig, Diagnostic};
pub use default_value::DefaultValueListener;
pub use error::{DdlError, DdlResult};
pub use parser::ColumnDefinitionReader;
pub use resolver::{resolve_column, resolve_column_definition, ColumnDefinitionResolver};
pub use walker::{ParseTreeListener, ParseTreeWalker};
