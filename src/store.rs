use sqlx::{
    migrate::MigrateError,
    pool::PoolConnection,
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, Row,
};

use crate::config::DatabaseSettings;
use crate::domain::{
    pagination::Pagination, subscriber::Subscriber, subscriber_email::SubscriberEmail,
};

// SQLSTATE raised by Postgres when a unique constraint rejects a row
const UNIQUE_VIOLATION: &str = "23505";

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("The email is already registered.")]
    DuplicateEmail,
    #[error("The subscribers storage is unavailable.")]
    StorageUnavailable(#[source] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateEmail => write!(f, "{}", self),
            StoreError::StorageUnavailable(err) => {
                write!(f, "{}\nCaused by:\n\t{:?}", self, err)
            }
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                StoreError::DuplicateEmail
            }
            _ => StoreError::StorageUnavailable(err),
        }
    }
}

/// Handle over the subscribers table. It is built once at startup and shared by every
/// request; it holds no records in memory.
#[derive(Clone, Debug)]
pub struct SubscriberStore {
    db_pool: PgPool,
}

impl SubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Builds the store without opening any connection: the pool connects on first use.
    pub fn connect_lazy(config: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        Ok(Self::new(get_connection_db_pool(config)?))
    }

    #[tracing::instrument(name = "Run subscribers storage migrations", skip(self))]
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await
    }

    /// Takes a connection out of the pool for the lifetime of the returned session.
    /// The connection goes back to the pool when the session is dropped.
    #[tracing::instrument(name = "Acquire a subscribers storage session", skip(self))]
    pub async fn session(&self) -> Result<StoreSession, StoreError> {
        let connection = self.db_pool.acquire().await.map_err(|err| {
            tracing::error!("Failed to acquire a database connection: {:?}", err);
            StoreError::StorageUnavailable(err)
        })?;

        Ok(StoreSession { connection })
    }
}

pub struct StoreSession {
    connection: PoolConnection<Postgres>,
}

impl StoreSession {
    #[tracing::instrument(
        name = "Find a subscriber by email",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn find_by_email(
        &mut self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        sqlx::query(
            r#"
            SELECT id, email
            FROM subscribers
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .try_map(subscriber_from_row)
        .fetch_optional(&mut *self.connection)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            StoreError::StorageUnavailable(err)
        })
    }

    /// Inserts a new subscriber. The unique constraint on `email` decides between
    /// concurrent inserts of the same address: the losing one gets `DuplicateEmail`.
    #[tracing::instrument(
        name = "Insert a new subscriber into the database",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn create(&mut self, email: &SubscriberEmail) -> Result<Subscriber, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (email)
            VALUES ($1)
            RETURNING id, email
            "#,
        )
        .bind(email.as_ref())
        .try_map(subscriber_from_row)
        .fetch_one(&mut *self.connection)
        .await
        .map_err(|err| {
            let err = StoreError::from(err);
            if matches!(err, StoreError::StorageUnavailable(_)) {
                tracing::error!("Failed to execute query: {:?}", err);
            }
            err
        })
    }

    #[tracing::instrument(
        name = "List subscribers",
        skip(self, pagination),
        fields(page_skip = pagination.skip, page_limit = pagination.limit)
    )]
    pub async fn list(&mut self, pagination: Pagination) -> Result<Vec<Subscriber>, StoreError> {
        sqlx::query(
            r#"
            SELECT id, email
            FROM subscribers
            ORDER BY id ASC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .try_map(subscriber_from_row)
        .fetch_all(&mut *self.connection)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            StoreError::StorageUnavailable(err)
        })
    }
}

fn subscriber_from_row(row: PgRow) -> Result<Subscriber, sqlx::Error> {
    Ok(Subscriber {
        id: row.try_get("id")?,
        email: SubscriberEmail::from_stored(row.try_get("email")?),
    })
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .acquire_timeout(config.get_acquire_timeout())
        .connect_lazy_with(config.get_db_options()?))
}
