//! mq-db: SQLite persistence for marquee.
//!
//! Provides an r2d2 connection pool with a versioned favorites schema and the
//! favorites queries behind the durable favorites store.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
