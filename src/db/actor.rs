use crate::db::models::{DbCafe, DbUser};
use crate::db::ops::{CafeUpsert, UserCreate};
use crate::db::schema::SQLITE_INIT;
use crate::error::AppError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbMessage {
    /// Insert a new account row and return its id.
    CreateUser(UserCreate, RpcReplyPort<Result<i64, AppError>>),

    /// Exact-match lookup by email (first row in id order if duplicated).
    FindUserByEmail(String, RpcReplyPort<Result<Option<DbUser>, AppError>>),

    /// Lookup by primary key; absent id resolves to `None`, not an error,
    /// so session resolution can fall back to anonymous.
    GetUserById(i64, RpcReplyPort<Result<Option<DbUser>, AppError>>),

    /// Insert a cafe; a name collision fails with `DuplicateName`.
    CreateCafe(CafeUpsert, RpcReplyPort<Result<i64, AppError>>),

    /// Full scan of the cafe table in id order.
    ListCafes(RpcReplyPort<Result<Vec<DbCafe>, AppError>>),

    /// Get a cafe by id; absent id fails with `NotFound`.
    GetCafe(i64, RpcReplyPort<Result<DbCafe, AppError>>),

    /// Full-record replace of all mutable fields.
    UpdateCafe(i64, CafeUpsert, RpcReplyPort<Result<(), AppError>>),

    /// Remove a cafe row.
    DeleteCafe(i64, RpcReplyPort<Result<(), AppError>>),
}

#[derive(Clone)]
pub struct DbHandle {
    actor: ActorRef<DbMessage>,
}

impl DbHandle {
    pub async fn create_user(&self, create: UserCreate) -> Result<i64, AppError> {
        ractor::call!(self.actor, DbMessage::CreateUser, create)
            .map_err(|e| AppError::ActorError(format!("DbActor CreateUser RPC failed: {e}")))?
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>, AppError> {
        ractor::call!(self.actor, DbMessage::FindUserByEmail, email.to_string())
            .map_err(|e| AppError::ActorError(format!("DbActor FindUserByEmail RPC failed: {e}")))?
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<DbUser>, AppError> {
        ractor::call!(self.actor, DbMessage::GetUserById, id)
            .map_err(|e| AppError::ActorError(format!("DbActor GetUserById RPC failed: {e}")))?
    }

    pub async fn create_cafe(&self, create: CafeUpsert) -> Result<i64, AppError> {
        ractor::call!(self.actor, DbMessage::CreateCafe, create)
            .map_err(|e| AppError::ActorError(format!("DbActor CreateCafe RPC failed: {e}")))?
    }

    pub async fn list_cafes(&self) -> Result<Vec<DbCafe>, AppError> {
        ractor::call!(self.actor, DbMessage::ListCafes)
            .map_err(|e| AppError::ActorError(format!("DbActor ListCafes RPC failed: {e}")))?
    }

    pub async fn get_cafe(&self, id: i64) -> Result<DbCafe, AppError> {
        ractor::call!(self.actor, DbMessage::GetCafe, id)
            .map_err(|e| AppError::ActorError(format!("DbActor GetCafe RPC failed: {e}")))?
    }

    pub async fn update_cafe(&self, id: i64, fields: CafeUpsert) -> Result<(), AppError> {
        ractor::call!(self.actor, DbMessage::UpdateCafe, id, fields)
            .map_err(|e| AppError::ActorError(format!("DbActor UpdateCafe RPC failed: {e}")))?
    }

    pub async fn delete_cafe(&self, id: i64) -> Result<(), AppError> {
        ractor::call!(self.actor, DbMessage::DeleteCafe, id)
            .map_err(|e| AppError::ActorError(format!("DbActor DeleteCafe RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbMessage::CreateUser(create, reply) => {
                let res = self.create_user(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbMessage::FindUserByEmail(email, reply) => {
                let res = self.find_user_by_email(&state.pool, &email).await;
                let _ = reply.send(res);
            }
            DbMessage::GetUserById(id, reply) => {
                let res = self.get_user_by_id(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbMessage::CreateCafe(create, reply) => {
                let res = self.create_cafe(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbMessage::ListCafes(reply) => {
                let res = self.list_cafes(&state.pool).await;
                let _ = reply.send(res);
            }
            DbMessage::GetCafe(id, reply) => {
                let res = self.get_cafe(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbMessage::UpdateCafe(id, fields, reply) => {
                let res = self.update_cafe(&state.pool, id, fields).await;
                let _ = reply.send(res);
            }
            DbMessage::DeleteCafe(id, reply) => {
                let res = self.delete_cafe(&state.pool, id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_user(&self, pool: &SqlitePool, create: UserCreate) -> Result<i64, AppError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
        INSERT INTO user_list (name, email, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
        )
        .bind(create.name)
        .bind(create.email)
        .bind(create.password_hash)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    async fn find_user_by_email(
        &self,
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<DbUser>, AppError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"
        SELECT id, name, email, password_hash, created_at
        FROM user_list
        WHERE email = ?
        ORDER BY id
        LIMIT 1
        "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn get_user_by_id(
        &self,
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<DbUser>, AppError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"
        SELECT id, name, email, password_hash, created_at
        FROM user_list
        WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn create_cafe(&self, pool: &SqlitePool, create: CafeUpsert) -> Result<i64, AppError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
        INSERT INTO cafe (
            name, map_url, img_url, location, seats,
            has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
        )
        .bind(create.name)
        .bind(create.map_url)
        .bind(create.img_url)
        .bind(create.location)
        .bind(create.seats)
        .bind(create.has_toilet)
        .bind(create.has_wifi)
        .bind(create.has_sockets)
        .bind(create.can_take_calls)
        .bind(create.coffee_price)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(duplicate_name_or_db)?;

        Ok(id)
    }

    async fn list_cafes(&self, pool: &SqlitePool) -> Result<Vec<DbCafe>, AppError> {
        let rows = sqlx::query_as::<_, DbCafe>(
            r#"
        SELECT id, name, map_url, img_url, location, seats,
               has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price,
               created_at, updated_at
        FROM cafe
        ORDER BY id
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn get_cafe(&self, pool: &SqlitePool, id: i64) -> Result<DbCafe, AppError> {
        let row = sqlx::query_as::<_, DbCafe>(
            r#"
        SELECT id, name, map_url, img_url, location, seats,
               has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price,
               created_at, updated_at
        FROM cafe
        WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.ok_or(AppError::NotFound)
    }

    async fn update_cafe(
        &self,
        pool: &SqlitePool,
        id: i64,
        fields: CafeUpsert,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
        UPDATE cafe SET
            name = ?,
            map_url = ?,
            img_url = ?,
            location = ?,
            seats = ?,
            has_toilet = ?,
            has_wifi = ?,
            has_sockets = ?,
            can_take_calls = ?,
            coffee_price = ?,
            updated_at = ?
        WHERE id = ?
        "#,
        )
        .bind(fields.name)
        .bind(fields.map_url)
        .bind(fields.img_url)
        .bind(fields.location)
        .bind(fields.seats)
        .bind(fields.has_toilet)
        .bind(fields.has_wifi)
        .bind(fields.has_sockets)
        .bind(fields.can_take_calls)
        .bind(fields.coffee_price)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .map_err(duplicate_name_or_db)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete_cafe(&self, pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Converts a storage-level uniqueness violation on `cafe.name` into the
/// explicit taxonomy error instead of letting the raw database error escape.
fn duplicate_name_or_db(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateName,
        _ => AppError::Database(err),
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed, so a process (and a test binary) may own several
/// independent databases.
pub async fn spawn(database_url: &str) -> DbHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), AppError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
