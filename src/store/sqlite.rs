use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqlitePoolOptions, SqliteRow},
    Row, Sqlite, SqlitePool,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{Result, TripError},
    store::TripStore,
    types::{CallerIdentity, GeneratedTrip, GroupType, TripRecord, User},
};

const TRIP_COLUMNS: &str = "t.id, t.user_id, t.destination, t.group_type, t.number_of_people, \
                            t.days, t.budget, t.result, t.created_at";

/// SQLite-backed trip store. The generated trip is kept as JSON text.
#[derive(Debug, Clone)]
pub struct SqliteTripStore {
    pool: SqlitePool,
}

impl SqliteTripStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
            info!(url, "created sqlite database");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database living as long as the store.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        setup_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, image, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row, "")).transpose()
    }
}

async fn setup_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            image TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trips (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            destination TEXT NOT NULL,
            group_type TEXT NOT NULL,
            number_of_people INTEGER NOT NULL,
            days INTEGER NOT NULL,
            budget TEXT NOT NULL,
            result TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_trips_user_created
        ON trips(user_id, created_at DESC);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn upsert_user(&self, identity: &CallerIdentity) -> Result<User> {
        let candidate = User::from_identity(identity);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(candidate.id.to_string())
        .bind(&candidate.email)
        .bind(&candidate.name)
        .bind(&candidate.image)
        .bind(encode_timestamp(&candidate.created_at))
        .execute(&self.pool)
        .await?;

        self.fetch_user_by_email(&identity.email)
            .await?
            .ok_or_else(|| {
                TripError::Persistence(format!("user {} vanished after insert", identity.email))
            })
    }

    async fn create_trip(&self, user_id: Uuid, trip: &GeneratedTrip) -> Result<TripRecord> {
        let record = TripRecord::new(user_id, trip.clone());
        let result = serde_json::to_string(&record.result)?;

        sqlx::query(
            r#"
            INSERT INTO trips
                (id, user_id, destination, group_type, number_of_people,
                 days, budget, result, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.destination)
        .bind(record.group_type.as_str())
        .bind(i64::from(record.number_of_people))
        .bind(i64::from(record.days))
        .bind(&record.budget)
        .bind(result)
        .bind(encode_timestamp(&record.created_at))
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<TripRecord>> {
        let row = sqlx::query(&format!("SELECT {TRIP_COLUMNS} FROM trips t WHERE t.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| trip_from_row(&row)).transpose()
    }

    async fn get_trip_with_owner(&self, id: Uuid) -> Result<Option<(TripRecord, User)>> {
        let row = sqlx::query(&format!(
            "SELECT {TRIP_COLUMNS}, u.id AS owner_id, u.email AS owner_email, \
             u.name AS owner_name, u.image AS owner_image, u.created_at AS owner_created_at \
             FROM trips t JOIN users u ON u.id = t.user_id WHERE t.id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Ok((trip_from_row(&row)?, user_from_row(&row, "owner_")?)))
            .transpose()
    }

    async fn list_trips_for_user(&self, email: &str) -> Result<Option<Vec<TripRecord>>> {
        let Some(user) = self.fetch_user_by_email(email).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips t WHERE t.user_id = ? ORDER BY t.created_at DESC"
        ))
        .bind(user.id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(trip_from_row)
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    async fn delete_trip(&self, id: Uuid) -> Result<bool> {
        let outcome = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(outcome.rows_affected() > 0)
    }
}

fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| TripError::Persistence(format!("bad timestamp `{raw}`: {err}")))
}

fn decode_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|err| TripError::Persistence(format!("bad id `{raw}`: {err}")))
}

fn decode_count(raw: i64, column: &str) -> Result<u32> {
    u32::try_from(raw)
        .map_err(|_| TripError::Persistence(format!("{column} out of range: {raw}")))
}

fn user_from_row(row: &SqliteRow, prefix: &str) -> Result<User> {
    let column = |name: &str| format!("{prefix}{name}");
    let id: String = row.try_get(column("id").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(User {
        id: decode_uuid(&id)?,
        email: row.try_get(column("email").as_str())?,
        name: row.try_get(column("name").as_str())?,
        image: row.try_get(column("image").as_str())?,
        created_at: decode_timestamp(&created_at)?,
    })
}

fn trip_from_row(row: &SqliteRow) -> Result<TripRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let group_type: String = row.try_get("group_type")?;
    let result: String = row.try_get("result")?;
    let created_at: String = row.try_get("created_at")?;

    let group_type: GroupType = group_type
        .parse()
        .map_err(|_| TripError::Persistence(format!("bad group type `{group_type}`")))?;
    let result: GeneratedTrip = serde_json::from_str(&result)
        .map_err(|err| TripError::Persistence(format!("bad trip payload: {err}")))?;

    Ok(TripRecord {
        id: decode_uuid(&id)?,
        user_id: decode_uuid(&user_id)?,
        destination: row.try_get("destination")?,
        group_type,
        number_of_people: decode_count(row.try_get("number_of_people")?, "number_of_people")?,
        days: decode_count(row.try_get("days")?, "days")?,
        budget: row.try_get("budget")?,
        result,
        created_at: decode_timestamp(&created_at)?,
    })
}
