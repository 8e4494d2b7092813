use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::{Database, DbId};

/// Account record. Credentials are checked against a sha256 hex digest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl User {
    pub async fn create(email: &str, password: &str, db: &Database) -> Result<User, sqlx::Error> {
        let id = DbId::generate();
        let password_hash = hash_password(password);

        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(email)
            .bind(&password_hash)
            .execute(&**db)
            .await?;

        Ok(User {
            id,
            email: email.to_string(),
            password_hash,
        })
    }

    pub async fn find(id: Uuid, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE id = ?1",
        )
        .bind(DbId::from(id))
        .fetch_optional(&**db)
        .await
    }

    pub async fn find_by_credentials(
        email: &str,
        password: &str,
        db: &Database,
    ) -> Result<Option<User>, sqlx::Error> {
        let password_hash = hash_password(password);
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE email = ?1 AND password_hash = ?2",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&**db)
        .await
    }

    pub async fn email_taken(email: &str, db: &Database) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&**db)
            .await?;
        Ok(count > 0)
    }
}
