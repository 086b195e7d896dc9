use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::AvatarUrl;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, avatar, refresh_token, confirmed, created_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: PgRow) -> Result<User, UserError> {
        Ok(User {
            id: UserId(row.get("id")),
            username: Username::new(row.get("username"))?,
            email: EmailAddress::new(row.get("email"))?,
            password_hash: row.get("password_hash"),
            avatar: row.get("avatar"),
            refresh_token: row.get("refresh_token"),
            confirmed: row.get("confirmed"),
            created_at: row.get("created_at"),
        })
    }

    fn updated(row: Option<PgRow>, user: &User) -> Result<User, UserError> {
        match row {
            Some(row) => Self::row_to_user(row),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, avatar, refresh_token, confirmed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(&user.refresh_token)
        .bind(user.confirmed)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn set_refresh_token(
        &self,
        user: &User,
        token: Option<String>,
    ) -> Result<User, UserError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET refresh_token = $2 WHERE email = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email.as_str())
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Self::updated(row, user)
    }

    async fn rotate_refresh_token(
        &self,
        user: &User,
        expected: &str,
        replacement: &str,
    ) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $3
            WHERE email = $1 AND refresh_token = $2
            "#,
        )
        .bind(user.email.as_str())
        .bind(expected)
        .bind(replacement)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_confirmed(&self, user: &User) -> Result<User, UserError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET confirmed = TRUE WHERE email = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Self::updated(row, user)
    }

    async fn set_avatar(&self, user: &User, avatar: &AvatarUrl) -> Result<User, UserError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET avatar = $2 WHERE email = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email.as_str())
        .bind(avatar.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Self::updated(row, user)
    }
}
