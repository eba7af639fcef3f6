//! Table descriptors
//!
//! A `TableBuilder` lives for one statement and collects the columns
//! resolved from each column definition, in declaration order.

use std::fmt;

use super::Column;

/// Fully qualified table identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    /// Database (catalog) name
    pub catalog: Option<String>,
    /// Table name
    pub table: String,
}

impl TableId {
    /// Create a new table identifier
    pub fn new(catalog: Option<String>, table: impl Into<String>) -> Self {
        Self {
            catalog,
            table: table.into(),
        }
    }

    /// Parse `db.table` or `table`
    pub fn parse(s: &str) -> Self {
        match s.split_once('.') {
            Some((catalog, table)) if !catalog.is_empty() => {
                Self::new(Some(catalog.to_string()), table)
            }
            _ => Self::new(None, s),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.catalog {
            Some(catalog) => write!(f, "{}.{}", catalog, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Immutable table descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
}

impl Table {
    /// Get column by name (case-insensitive)
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Mutable, in-progress table descriptor
#[derive(Debug, Clone)]
pub struct TableBuilder {
    id: TableId,
    columns: Vec<Column>,
    primary_key: Vec<String>,
}

impl TableBuilder {
    /// Create an empty table builder
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn table_id(&self) -> &TableId {
        &self.id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get column by name (case-insensitive)
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Add a column, replacing an earlier column of the same name in place
    ///
    /// Positions are reassigned so they stay 1-based and contiguous.
    pub fn add_column(&mut self, column: Column) {
        match self
            .columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(&column.name))
        {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        for (idx, col) in self.columns.iter_mut().enumerate() {
            col.position = idx + 1;
        }
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    pub fn primary_key_names(&self) -> &[String] {
        &self.primary_key
    }

    /// Set the primary key columns, replacing any existing key
    ///
    /// Duplicate names (case-insensitive) are collapsed, first one wins.
    pub fn set_primary_key_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut primary_key: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !primary_key.iter().any(|pk| pk.eq_ignore_ascii_case(&name)) {
                primary_key.push(name);
            }
        }
        self.primary_key = primary_key;
    }

    /// Build the immutable table
    pub fn create(&self) -> Table {
        Table {
            id: self.id.clone(),
            columns: self.columns.clone(),
            primary_key: self.primary_key.clone(),
        }
    }
}
