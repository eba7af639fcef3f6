//! ddl-schema - Column definition resolution for DDL-to-schema translation
//!
//! Features:
//! - Normalized column descriptors from MySQL/MariaDB column definitions
//! - Event-driven resolver over a closed set of grammar shapes
//! - Primary-key promotion and SERIAL alias expansion

pub mod catalog;
pub mod sql;
