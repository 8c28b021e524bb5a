#[cfg(feature = "database")]
use anyhow::Result;
#[cfg(feature = "database")]
use async_trait::async_trait;
#[cfg(feature = "database")]
use chrono::{DateTime, Utc};
#[cfg(feature = "database")]
use sqlx::{migrate::MigrateDatabase, Row, SqlitePool};
#[cfg(feature = "database")]
use tracing::info;

#[cfg(feature = "database")]
use crate::account::{Account, AccountId, AccountStore, Owner};

#[cfg(feature = "database")]
/// SQLite-backed account store
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

#[cfg(feature = "database")]
impl SqliteAccountStore {
    /// Connect, creating the database and schema if missing
    pub async fn new(database_url: &str) -> Result<Self> {
        if !sqlx::Sqlite::database_exists(database_url).await? {
            info!("Creating database at {}", database_url);
            sqlx::Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                owner_email TEXT NOT NULL,
                amount REAL NOT NULL,
                account_type TEXT NOT NULL,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Close database connections gracefully
    pub async fn shutdown(&self) {
        info!("Shutting down database connections...");
        self.pool.close().await;
        info!("Database connections closed");
    }

    fn account_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let id: String = row.get("id");
        let owner_email: String = row.get("owner_email");
        let amount: f64 = row.get("amount");
        let account_type: String = row.get("account_type");
        let state: String = row.get("state");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(Account {
            id: id.parse()?,
            owner: Owner::new(owner_email),
            amount,
            account_type: account_type.parse()?,
            state: state.parse()?,
            created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)?.with_timezone(&Utc),
        })
    }
}

#[cfg(feature = "database")]
#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn save(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO accounts
                (id, owner_email, amount, account_type, state, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.owner.email)
        .bind(account.amount)
        .bind(account.account_type.to_string())
        .bind(account.state.to_string())
        .bind(account.created_at.to_rfc3339())
        .bind(account.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::account_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, email: &str) -> Result<Vec<Account>> {
        let rows = sqlx::query("SELECT * FROM accounts WHERE owner_email = ?1 ORDER BY created_at ASC")
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::account_from_row).collect()
    }
}

#[cfg(feature = "database")]
/// Pick the store configured for this run: SQLite when a database section is
/// present, in-memory otherwise.
pub async fn init_store(
    config: &crate::config::TellerConfig,
) -> anyhow::Result<std::sync::Arc<dyn crate::account::AccountStore>> {
    match &config.database {
        Some(db_config) => {
            info!("Initializing database at {}", db_config.url);
            let store = SqliteAccountStore::new(&db_config.url).await?;
            Ok(std::sync::Arc::new(store))
        }
        None => {
            info!("Database not configured, using in-memory store");
            Ok(std::sync::Arc::new(crate::store::InMemoryAccountStore::new()))
        }
    }
}

// Stub implementation for when the database feature is not enabled
#[cfg(not(feature = "database"))]
pub async fn init_store(
    config: &crate::config::TellerConfig,
) -> anyhow::Result<std::sync::Arc<dyn crate::account::AccountStore>> {
    if config.database.is_some() {
        tracing::warn!("Database configured but the database feature is not enabled");
    }
    tracing::info!("Using in-memory account store");
    Ok(std::sync::Arc::new(crate::store::InMemoryAccountStore::new()))
}

#[cfg(all(test, feature = "database"))]
mod tests {
    use super::*;
    use crate::account::{AccountState, AccountType};

    #[tokio::test]
    async fn sqlite_store_round_trips_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("teller.db").display());
        let store = SqliteAccountStore::new(&url).await.unwrap();

        let mut account = Account::open(Owner::new("amy@example.com"), AccountType::Savings);
        account.state = AccountState::ApprovalPending;
        account.amount = 125.5;
        store.save(&account).await.unwrap();

        let found = store.find(account.id).await.unwrap().unwrap();
        assert_eq!(found.owner.email, "amy@example.com");
        assert_eq!(found.state, AccountState::ApprovalPending);
        assert_eq!(found.account_type, AccountType::Savings);

        let owned = store.find_by_owner("amy@example.com").await.unwrap();
        assert_eq!(owned.len(), 1);

        store.shutdown().await;
    }
}
