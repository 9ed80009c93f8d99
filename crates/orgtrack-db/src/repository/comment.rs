//! SurrealDB implementation of [`CommentRepository`].

use chrono::{DateTime, Utc};
use orgtrack_core::EntityKind;
use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::comment::{Comment, CreateComment};
use orgtrack_core::repository::CommentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{ensure_parent, not_found, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CommentRow {
    task_id: String,
    content: String,
    author_email: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CommentRowWithId {
    record_id: String,
    task_id: String,
    content: String,
    author_email: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self, id: Uuid) -> Result<Comment, DbError> {
        Ok(Comment {
            id,
            task_id: parse_uuid("task", &self.task_id)?,
            content: self.content,
            author_email: self.author_email,
            created_at: self.created_at,
        })
    }
}

impl CommentRowWithId {
    fn try_into_comment(self) -> Result<Comment, DbError> {
        let id = parse_uuid("comment", &self.record_id)?;
        Ok(Comment {
            id,
            task_id: parse_uuid("task", &self.task_id)?,
            content: self.content,
            author_email: self.author_email,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Comment repository.
pub struct SurrealCommentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealCommentRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealCommentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommentRepository for SurrealCommentRepository<C> {
    async fn create(&self, input: CreateComment) -> OrgtrackResult<Comment> {
        ensure_parent(&self.db, EntityKind::Task, input.task_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('comment', $id) SET \
                 task_id = $task_id, \
                 content = $content, author_email = $author_email",
            )
            .bind(("id", id_str.clone()))
            .bind(("task_id", input.task_id.to_string()))
            .bind(("content", input.content))
            .bind(("author_email", input.author_email))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Comment, &id_str))?;

        Ok(row.into_comment(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtrackResult<Comment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('comment', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Comment, &id_str))?;

        Ok(row.into_comment(id)?)
    }

    async fn list_by_task(&self, task_id: Uuid) -> OrgtrackResult<Vec<Comment>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE task_id = $task_id \
                 ORDER BY created_at ASC, record_id ASC",
            )
            .bind(("task_id", task_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_comment())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
