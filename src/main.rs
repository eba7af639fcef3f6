//! ddl-schema binary
//!
//! Usage: ddl-schema --table db.t --column "id INT PRIMARY KEY" --column "..."
//!
//! Exit codes:
//!   0 - Success
//!   2 - A column definition was rejected

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ddl_schema::catalog::{TableBuilder, TableId};
use ddl_schema::sql::{resolve_column, DdlParser, DdlParserConfig};

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve column definitions into a table schema")]
struct Cli {
    /// Table identifier (`db.table` or `table`)
    #[arg(long, default_value = "t")]
    table: String,

    /// Column definition, repeatable (e.g. "price DECIMAL(10,2) NOT NULL")
    #[arg(long = "column", required = true)]
    columns: Vec<String>,

    /// Ignore COMMENT clauses
    #[arg(long, env = "DDL_SCHEMA_SKIP_COMMENTS")]
    skip_comments: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Cli {
        table,
        columns,
        skip_comments,
    } = Cli::parse();

    let mut parser = DdlParser::new(DdlParserConfig { skip_comments });
    let mut table = TableBuilder::new(TableId::parse(&table));

    for definition in &columns {
        if let Err(e) = resolve_column(&mut parser, Some(&mut table), definition) {
            eprintln!("ERROR: {}: {}", definition, e);
            std::process::exit(2);
        }
    }

    let table = table.create();
    println!("table {}", table.id);
    for col in &table.columns {
        let mut line = format!("  {:>2} {} {}", col.position, col.name, col.type_name);
        if let Some(length) = col.length {
            match col.scale {
                Some(scale) => line.push_str(&format!("({},{})", length, scale)),
                None => line.push_str(&format!("({})", length)),
            }
        }
        line.push_str(&format!(" jdbc={}", col.type_code()));
        if let Some(charset) = &col.charset_name {
            line.push_str(&format!(" charset={}", charset));
        }
        if !col.optional {
            line.push_str(" NOT NULL");
        }
        if col.auto_incremented {
            line.push_str(" AUTO_INCREMENT");
        }
        if col.generated {
            line.push_str(" GENERATED");
        }
        if !col.enum_values.is_empty() {
            line.push_str(&format!(" values={:?}", col.enum_values));
        }
        if let Some(default) = &col.default_value_expression {
            line.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(comment) = &col.comment {
            line.push_str(&format!(" COMMENT {:?}", comment));
        }
        println!("{}", line);
    }
    if !table.primary_key.is_empty() {
        println!("primary key ({})", table.primary_key.join(", "));
    }
}
