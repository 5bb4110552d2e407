//! Persistence layer: repository ports and their PostgreSQL
//! implementations.

pub mod ports;
pub mod postgres;
pub mod repositories;

pub use postgres::PostgresDatabase;
