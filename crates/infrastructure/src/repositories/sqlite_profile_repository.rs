use crate::database::{trainers, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use domain::{DomainError, ProfileRepository, TrainerSummary, UserProfile};

// Database row - separate from the domain entity. The profile body is stored
// as a JSON document; the key and the last-played stamp are mirrored into
// columns so summaries never need to parse the document.
#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = trainers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct TrainerRow {
    username: String,
    data: String,
    last_played: NaiveDateTime,
}

pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn list_summaries(&self) -> Vec<TrainerSummary> {
        let mut conn = match self.pool.get() {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("failed to list trainers: {}", err);
                return Vec::new();
            }
        };

        let rows = tokio::task::spawn_blocking(move || {
            trainers::table
                .select((trainers::username, trainers::last_played))
                .load::<(String, NaiveDateTime)>(&mut conn)
        })
        .await;

        match rows {
            Ok(Ok(rows)) => rows
                .into_iter()
                .map(|(username, last_played)| TrainerSummary {
                    username,
                    last_played: Some(last_played.and_utc()),
                })
                .collect(),
            Ok(Err(err)) => {
                tracing::warn!("failed to list trainers: {}", err);
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("failed to list trainers: {}", err);
                Vec::new()
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Option<UserProfile> {
        let mut conn = match self.pool.get() {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("failed to load trainer {}: {}", username, err);
                return None;
            }
        };

        let key = username.to_string();
        let row = tokio::task::spawn_blocking(move || {
            trainers::table
                .filter(trainers::username.eq(key))
                .select(TrainerRow::as_select())
                .first::<TrainerRow>(&mut conn)
                .optional()
        })
        .await;

        let row = match row {
            Ok(Ok(row)) => row?,
            Ok(Err(err)) => {
                tracing::warn!("failed to load trainer {}: {}", username, err);
                return None;
            }
            Err(err) => {
                tracing::warn!("failed to load trainer {}: {}", username, err);
                return None;
            }
        };

        match serde_json::from_str(&row.data) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!("corrupt profile record for {}: {}", username, err);
                None
            }
        }
    }

    async fn save(&self, profile: &UserProfile) -> Result<UserProfile, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        let now = Utc::now();
        let mut stamped = profile.clone();
        stamped.last_played = Some(now);

        let row = TrainerRow {
            username: stamped.username.clone(),
            data: serde_json::to_string(&stamped)
                .map_err(|err| DomainError::SerializationError(err.to_string()))?,
            last_played: now.naive_utc(),
        };

        // Single REPLACE statement: the upsert is atomic with respect to
        // readers, last write wins.
        tokio::task::spawn_blocking(move || {
            diesel::replace_into(trainers::table)
                .values(&row)
                .execute(&mut conn)
        })
        .await
        .map_err(|err| DomainError::RepositoryError(err.to_string()))?
        .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        Ok(stamped)
    }

    async fn delete(&self, username: &str) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        let key = username.to_string();
        tokio::task::spawn_blocking(move || {
            diesel::delete(trainers::table.filter(trainers::username.eq(key))).execute(&mut conn)
        })
        .await
        .map_err(|err| DomainError::RepositoryError(err.to_string()))?
        .map_err(|err| DomainError::RepositoryError(err.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use domain::{Gender, PokemonRecord, PokemonType, SlotTarget};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    /// Open a store backed by a unique temp-dir database file, so parallel
    /// tests don't collide.
    fn test_repository() -> SqliteProfileRepository {
        let pid = std::process::id();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("pokedream-test-{}-{}", pid, ts));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trainers.db");

        let database = Database::open(path.to_str().unwrap()).unwrap();
        SqliteProfileRepository::new(database.get_pool().clone())
    }

    fn sample_pokemon() -> PokemonRecord {
        PokemonRecord {
            id: Uuid::new_v4(),
            species_name: "Pikachu".to_string(),
            nickname: Some("Sparky".to_string()),
            dex_number: 25,
            types: vec![PokemonType::Electric],
            level: 42,
            gender: Gender::Female,
            ot: "Red".to_string(),
            id_no: "00042".to_string(),
            met_location: "Viridian Forest".to_string(),
            met_date: "1998-09-28".to_string(),
            met_game: "Yellow".to_string(),
            met_level: Some(5),
            dream_text: "I remember the smell of rain.".to_string(),
            sprite_url: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png".to_string(),
        }
    }

    #[tokio::test]
    async fn unknown_username_loads_as_none() {
        let repository = test_repository();
        assert!(repository.find_by_username("Missingno").await.is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_modulo_timestamp() {
        let repository = test_repository();
        let mut profile = UserProfile::new("Red");
        profile
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon())
            .unwrap();

        let before = Utc::now();
        let saved = repository.save(&profile).await.unwrap();
        let loaded = repository.find_by_username("Red").await.unwrap();

        assert!(saved.last_played.unwrap() >= before);
        assert_eq!(loaded, saved);

        let mut without_stamp = loaded.clone();
        without_stamp.last_played = None;
        assert_eq!(without_stamp, profile);
    }

    #[tokio::test]
    async fn save_overwrites_caller_supplied_timestamp() {
        let repository = test_repository();
        let mut profile = UserProfile::new("Red");
        profile.last_played = Some("2000-01-01T00:00:00Z".parse().unwrap());

        let before = Utc::now();
        let saved = repository.save(&profile).await.unwrap();

        assert!(saved.last_played.unwrap() >= before);
    }

    #[tokio::test]
    async fn save_is_last_write_wins() {
        let repository = test_repository();
        let mut first = UserProfile::new("Red");
        first
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon())
            .unwrap();
        repository.save(&first).await.unwrap();

        // Second save fully replaces the record, including emptied slots.
        let second = UserProfile::new("Red");
        repository.save(&second).await.unwrap();

        let loaded = repository.find_by_username("Red").await.unwrap();
        assert_eq!(loaded.boxes[0].occupied_count(), 0);
    }

    #[tokio::test]
    async fn delete_then_load_yields_none() {
        let repository = test_repository();
        repository.save(&UserProfile::new("Red")).await.unwrap();

        repository.delete("Red").await.unwrap();

        assert!(repository.find_by_username("Red").await.is_none());
    }

    #[tokio::test]
    async fn deleting_an_absent_key_is_a_noop_success() {
        let repository = test_repository();
        assert!(repository.delete("Missingno").await.is_ok());
    }

    #[tokio::test]
    async fn list_summaries_covers_all_saved_trainers() {
        let repository = test_repository();
        repository.save(&UserProfile::new("Red")).await.unwrap();
        repository.save(&UserProfile::new("Blue")).await.unwrap();

        let mut summaries = repository.list_summaries().await;
        summaries.sort_by(|a, b| a.username.cmp(&b.username));

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].username, "Blue");
        assert_eq!(summaries[1].username, "Red");
        assert!(summaries.iter().all(|s| s.last_played.is_some()));
    }

    #[tokio::test]
    async fn reads_fail_soft_when_storage_is_broken() {
        let repository = test_repository();
        repository.save(&UserProfile::new("Red")).await.unwrap();

        let mut conn = repository.pool.get().unwrap();
        diesel::sql_query("DROP TABLE trainers")
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        assert!(repository.list_summaries().await.is_empty());
        assert!(repository.find_by_username("Red").await.is_none());
    }

    #[tokio::test]
    async fn writes_propagate_storage_faults() {
        let repository = test_repository();
        let mut conn = repository.pool.get().unwrap();
        diesel::sql_query("DROP TABLE trainers")
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        let result = repository.save(&UserProfile::new("Red")).await;
        assert!(matches!(result, Err(DomainError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn corrupt_rows_load_as_none() {
        let repository = test_repository();
        repository.save(&UserProfile::new("Red")).await.unwrap();

        let mut conn = repository.pool.get().unwrap();
        diesel::update(trainers::table.filter(trainers::username.eq("Red")))
            .set(trainers::data.eq("{ not json"))
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        assert!(repository.find_by_username("Red").await.is_none());
    }
}
