use crate::domain::payment::{Amount, PaymentMethod, PaymentRecord};
use crate::domain::ports::{PaymentStore, UserStore};
use crate::domain::user::{PasswordDigest, UserRecord, Username};
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_digest TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL,
        amount TEXT NOT NULL,
        method TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_payments_username
    ON payments(username);
";

/// A persistent store backed by a single SQLite database.
///
/// Implements both `UserStore` and `PaymentStore` over the `users` and
/// `payments` tables. `Clone` shares the underlying connection, which is
/// closed once the last handle is dropped.
///
/// `payments.username` is deliberately not a foreign key into `users`.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened store");
        Self::initialize(conn)
    }

    /// Opens an existing database without creating or migrating anything.
    ///
    /// Fails if `path` does not exist. Writes through the returned store fail
    /// with `Storage`.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        tracing::info!(path = %path.display(), "opened store read-only");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn insert_user(conn: &Connection, username: &Username, digest: &PasswordDigest) -> Result<UserRecord> {
    match conn.execute(
        "INSERT INTO users (username, password_digest) VALUES (?1, ?2)",
        params![username.as_str(), digest.as_str()],
    ) {
        Ok(_) => Ok(UserRecord {
            id: conn.last_insert_rowid(),
            username: username.clone(),
            password_digest: digest.clone(),
        }),
        Err(e) if is_unique_violation(&e) => Err(StorefrontError::DuplicateUsername),
        Err(e) => Err(e.into()),
    }
}

fn select_user(conn: &Connection, username: &Username) -> Result<Option<UserRecord>> {
    let row = conn
        .query_row(
            "SELECT id, password_digest FROM users WHERE username = ?1",
            params![username.as_str()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    match row {
        Some((id, stored)) => Ok(Some(UserRecord {
            id,
            username: username.clone(),
            password_digest: PasswordDigest::from_stored(stored)?,
        })),
        None => Ok(None),
    }
}

fn insert_payment(
    conn: &Connection,
    username: &Username,
    amount: Amount,
    method: PaymentMethod,
) -> Result<PaymentRecord> {
    conn.execute(
        "INSERT INTO payments (username, amount, method) VALUES (?1, ?2, ?3)",
        params![username.as_str(), amount.value().to_string(), method.as_str()],
    )?;
    Ok(PaymentRecord {
        id: conn.last_insert_rowid(),
        username: username.clone(),
        amount,
        method,
    })
}

type RawPayment = (i64, String, String, String);

fn raw_payment(row: &Row<'_>) -> rusqlite::Result<RawPayment> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_payment((id, username, amount, method): RawPayment) -> Result<PaymentRecord> {
    let value = Decimal::from_str(&amount)
        .map_err(|e| StorefrontError::Corrupt(format!("payment {id} amount {amount:?}: {e}")))?;
    let amount = Amount::new(value)
        .map_err(|e| StorefrontError::Corrupt(format!("payment {id}: {e}")))?;
    let method = PaymentMethod::from_str(&method)
        .map_err(|e| StorefrontError::Corrupt(format!("payment {id}: {e}")))?;
    let username = Username::new(&username)
        .map_err(|e| StorefrontError::Corrupt(format!("payment {id}: {e}")))?;
    Ok(PaymentRecord {
        id,
        username,
        amount,
        method,
    })
}

fn select_payments(conn: &Connection, username: Option<&Username>) -> Result<Vec<PaymentRecord>> {
    let rows = match username {
        Some(username) => {
            let mut stmt = conn.prepare(
                "SELECT id, username, amount, method FROM payments WHERE username = ?1 ORDER BY id",
            )?;
            stmt.query_map(params![username.as_str()], raw_payment)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let mut stmt =
                conn.prepare("SELECT id, username, amount, method FROM payments ORDER BY id")?;
            stmt.query_map([], raw_payment)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
    };
    rows.into_iter().map(decode_payment).collect()
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create(&self, username: &Username, digest: &PasswordDigest) -> Result<UserRecord> {
        let conn = self.conn.lock().await;
        insert_user(&conn, username, digest)
    }

    async fn find(&self, username: &Username) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        select_user(&conn, username)
    }
}

#[async_trait]
impl PaymentStore for SqliteStore {
    async fn append(
        &self,
        username: &Username,
        amount: Amount,
        method: PaymentMethod,
    ) -> Result<PaymentRecord> {
        let conn = self.conn.lock().await;
        insert_payment(&conn, username, amount, method)
    }

    async fn for_user(&self, username: &Username) -> Result<Vec<PaymentRecord>> {
        let conn = self.conn.lock().await;
        select_payments(&conn, Some(username))
    }

    async fn all_payments(&self) -> Result<Vec<PaymentRecord>> {
        let conn = self.conn.lock().await;
        select_payments(&conn, None)
    }
}
