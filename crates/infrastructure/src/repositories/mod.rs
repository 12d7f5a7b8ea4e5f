pub mod sqlite_profile_repository;

pub use sqlite_profile_repository::SqliteProfileRepository;
