use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::{Database, DbId, DocumentKind};

/// Listings are served in fixed pages of 20 documents.
pub const PAGE_SIZE: u32 = 20;

/// Folder, file, or image metadata record.
///
/// `parent_id = None` means the document sits at the root. `local_path` is
/// always `None` for folders; for files and images it is `None` only during
/// the window between metadata and content persistence (or permanently, if
/// the content write failed). Rows are never hard-deleted and the owner
/// never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub kind: DocumentKind,
    pub parent_id: Option<DbId>,
    pub is_public: bool,
    pub local_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

const DOCUMENT_COLUMNS: &str =
    "id, user_id, name, kind, parent_id, is_public, local_path, created_at";

impl Document {
    pub async fn create(
        user_id: Uuid,
        name: &str,
        kind: DocumentKind,
        parent_id: Option<Uuid>,
        is_public: bool,
        db: &Database,
    ) -> Result<Document, sqlx::Error> {
        let document = Document {
            id: DbId::generate(),
            user_id: user_id.into(),
            name: name.to_string(),
            kind,
            parent_id: parent_id.map(Into::into),
            is_public,
            local_path: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents (id, user_id, name, kind, parent_id, is_public, local_path, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(document.id)
        .bind(document.user_id)
        .bind(&document.name)
        .bind(document.kind)
        .bind(document.parent_id)
        .bind(document.is_public)
        .bind(document.local_path.clone())
        .bind(document.created_at)
        .execute(&**db)
        .await?;

        Ok(document)
    }

    pub async fn find(id: Uuid, db: &Database) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"
        ))
        .bind(DbId::from(id))
        .fetch_optional(&**db)
        .await
    }

    /// Fetch a document only if it belongs to `user_id`.
    pub async fn find_for_owner(
        id: Uuid,
        user_id: Uuid,
        db: &Database,
    ) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(DbId::from(id))
        .bind(DbId::from(user_id))
        .fetch_optional(&**db)
        .await
    }

    /// Page through an owner's documents under a parent, in creation order.
    ///
    /// `page` is zero-indexed; a page past the end yields an empty vec.
    pub async fn list(
        parent_id: Option<Uuid>,
        user_id: Uuid,
        page: u32,
        db: &Database,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let offset = (page as i64) * (PAGE_SIZE as i64);
        sqlx::query_as::<_, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM documents
            WHERE parent_id IS ?1 AND user_id = ?2
            ORDER BY rowid
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(parent_id.map(DbId::from))
        .bind(DbId::from(user_id))
        .bind(PAGE_SIZE as i64)
        .bind(offset)
        .fetch_all(&**db)
        .await
    }

    /// Record where the document's bytes landed in the content store.
    pub async fn set_local_path(&mut self, path: &str, db: &Database) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE documents SET local_path = ?1 WHERE id = ?2")
            .bind(path)
            .bind(self.id)
            .execute(&**db)
            .await?;
        self.local_path = Some(path.to_string());
        Ok(())
    }

    /// Toggle `is_public`, scoped to the owner. Returns the updated row, or
    /// `None` when no document with `id` is owned by `user_id`. Setting the
    /// same value twice is a no-op.
    pub async fn set_visibility(
        id: Uuid,
        user_id: Uuid,
        is_public: bool,
        db: &Database,
    ) -> Result<Option<Document>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE documents SET is_public = ?1 WHERE id = ?2 AND user_id = ?3",
        )
        .bind(is_public)
        .bind(DbId::from(id))
        .bind(DbId::from(user_id))
        .execute(&**db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_for_owner(id, user_id, db).await
    }
}
