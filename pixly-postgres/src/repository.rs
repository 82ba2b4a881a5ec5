use crate::query::{filter_where, sql_for_partial_update, COLUMN_ALIASES};
use async_trait::async_trait;
use pixly_core::{Image, ImageFilter, ImagePatch, ImageStore, NewImage, PixlyError, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const COLUMNS: &str = "id, name, camera, style, image_location, image_url";

pub struct PostgresImageStore {
    pub pool: PgPool,
    pub table: String,
}

fn storage(e: sqlx::Error) -> PixlyError {
    PixlyError::Storage(e.to_string())
}

/// A UNIQUE violation on `name` means someone else took it first.
fn write_error(e: sqlx::Error, name: &str) -> PixlyError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => PixlyError::duplicate_image(name),
        _ => storage(e),
    }
}

impl PostgresImageStore {
    /// Create a store using the default table name `images`.
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::new_with_table(database_url, "images").await
    }

    /// Create a store with a custom table name (useful for test isolation).
    pub async fn new_with_table(database_url: &str, table: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await.map_err(storage)?;
        Self::new_with_pool(pool, table).await
    }

    pub async fn new_with_pool(pool: PgPool, table: &str) -> Result<Self> {
        let store = Self {
            pool,
            table: table.to_string(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                camera TEXT NOT NULL,
                style TEXT NOT NULL DEFAULT 'normal',
                image_location TEXT NOT NULL,
                image_url TEXT NOT NULL
            )",
            self.table
        );
        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    fn row_to_image(row: &PgRow) -> Result<Image> {
        Ok(Image {
            id: row.try_get("id").map_err(storage)?,
            name: row.try_get("name").map_err(storage)?,
            camera: row.try_get("camera").map_err(storage)?,
            style: row.try_get("style").map_err(storage)?,
            image_location: row.try_get("image_location").map_err(storage)?,
            image_url: row.try_get("image_url").map_err(storage)?,
        })
    }
}

#[async_trait]
impl ImageStore for PostgresImageStore {
    async fn add(&self, image: NewImage) -> Result<Image> {
        let sql = format!("SELECT name FROM {} WHERE name = $1", self.table);
        let existing = sqlx::query(&sql)
            .bind(&image.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        if existing.is_some() {
            return Err(PixlyError::duplicate_image(&image.name));
        }

        self.insert(image).await
    }

    async fn insert(&self, image: NewImage) -> Result<Image> {
        // Leave style out entirely when unset so the column default applies.
        let sql = match image.style {
            Some(_) => format!(
                "INSERT INTO {} (name, camera, image_url, image_location, style)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {COLUMNS}",
                self.table
            ),
            None => format!(
                "INSERT INTO {} (name, camera, image_url, image_location)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {COLUMNS}",
                self.table
            ),
        };

        let mut q = sqlx::query(&sql)
            .bind(&image.name)
            .bind(&image.camera)
            .bind(&image.image_url)
            .bind(&image.image_location);
        if let Some(style) = &image.style {
            q = q.bind(style);
        }

        let row = q
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &image.name))?;
        Self::row_to_image(&row)
    }

    async fn find_all(&self, filter: &ImageFilter) -> Result<Vec<Image>> {
        let where_part = filter_where(filter);

        let sql = if where_part.clause.is_empty() {
            format!("SELECT {COLUMNS} FROM {} ORDER BY name", self.table)
        } else {
            format!(
                "SELECT {COLUMNS} FROM {} {} ORDER BY name",
                self.table, where_part.clause
            )
        };

        let mut q = sqlx::query(&sql);
        for val in &where_part.values {
            q = q.bind(val);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(storage)?;
        rows.iter().map(Self::row_to_image).collect()
    }

    async fn get(&self, id: i32) -> Result<Image> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        match row {
            None => Err(PixlyError::image_not_found()),
            Some(r) => Self::row_to_image(&r),
        }
    }

    async fn update(&self, id: i32, patch: &ImagePatch) -> Result<Image> {
        let set_part = sql_for_partial_update(&patch.fields(), COLUMN_ALIASES)?;
        let id_idx = set_part.values.len() + 1;

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {COLUMNS}",
            self.table, set_part.clause, id_idx
        );

        let mut q = sqlx::query(&sql);
        for val in &set_part.values {
            q = q.bind(val);
        }

        let row = q
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, patch.name.as_deref().unwrap_or_default()))?;

        match row {
            None => Err(PixlyError::image_not_found()),
            Some(r) => Self::row_to_image(&r),
        }
    }

    async fn remove(&self, id: i32) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(PixlyError::image_not_found());
        }
        Ok(())
    }
}
