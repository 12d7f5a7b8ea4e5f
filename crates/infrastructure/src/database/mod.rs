use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use domain::DomainError;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TRAINERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS trainers (
    username TEXT PRIMARY KEY NOT NULL,
    data TEXT NOT NULL,
    last_played TIMESTAMP NOT NULL
)";

/// Explicitly constructed store handle with a pooled SQLite connection.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the SQLite database at `database_path` and make sure
    /// the schema exists.
    pub fn open(database_path: &str) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .build(manager)
            .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        let mut conn = pool
            .get()
            .map_err(|err| DomainError::RepositoryError(err.to_string()))?;
        diesel::sql_query(CREATE_TRAINERS_TABLE)
            .execute(&mut conn)
            .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
