pub mod database;
pub mod repositories;

pub use database::{Database, SqlitePool};
pub use repositories::SqliteProfileRepository;
