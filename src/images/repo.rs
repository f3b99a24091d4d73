use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Profile-image metadata. `user_id` is UNIQUE in the schema, so at most one
/// row can exist per user at any time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub s3_key: String,
    pub uploaded_at: OffsetDateTime,
}

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Image>> {
    let image = sqlx::query_as::<_, Image>(
        r#"
        SELECT id, user_id, file_name, content_type, s3_key, uploaded_at
        FROM images
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(image)
}

pub async fn insert(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    file_name: &str,
    content_type: &str,
    s3_key: &str,
) -> Result<Image, sqlx::Error> {
    sqlx::query_as::<_, Image>(
        r#"
        INSERT INTO images (id, user_id, file_name, content_type, s3_key)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, file_name, content_type, s3_key, uploaded_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(file_name)
    .bind(content_type)
    .bind(s3_key)
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query(r#"DELETE FROM images WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
