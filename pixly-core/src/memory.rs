use crate::{
    Image, ImageFilter, ImagePatch, ImageStore, NewImage, PixlyError, Result, DEFAULT_STYLE,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Rows {
    last_id: i32,
    by_id: BTreeMap<i32, Image>,
}

impl Rows {
    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.by_id
            .values()
            .any(|img| img.name == name && Some(img.id) != except)
    }
}

/// Process-local [`ImageStore`] with the same semantics as the SQL store.
/// Intended for tests and local development.
#[derive(Default)]
pub struct MemoryImageStore {
    rows: RwLock<Rows>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref() {
        None | Some("") => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn add(&self, image: NewImage) -> Result<Image> {
        if self.rows.read().await.name_taken(&image.name, None) {
            return Err(PixlyError::duplicate_image(&image.name));
        }
        self.insert(image).await
    }

    async fn insert(&self, image: NewImage) -> Result<Image> {
        let mut rows = self.rows.write().await;
        // Stands in for the UNIQUE constraint on name.
        if rows.name_taken(&image.name, None) {
            return Err(PixlyError::duplicate_image(&image.name));
        }
        rows.last_id += 1;
        let stored = Image {
            id: rows.last_id,
            name: image.name,
            camera: image.camera,
            style: image.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            image_location: image.image_location,
            image_url: image.image_url,
        };
        rows.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_all(&self, filter: &ImageFilter) -> Result<Vec<Image>> {
        let rows = self.rows.read().await;
        let mut found: Vec<Image> = rows
            .by_id
            .values()
            .filter(|img| {
                contains_ci(&img.style, &filter.style)
                    && contains_ci(&img.name, &filter.name)
                    && contains_ci(&img.image_location, &filter.image_location)
                    && contains_ci(&img.camera, &filter.camera)
            })
            .cloned()
            .collect();
        // Byte order; the SQL store follows the database collation instead.
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get(&self, id: i32) -> Result<Image> {
        self.rows
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(PixlyError::image_not_found)
    }

    async fn update(&self, id: i32, patch: &ImagePatch) -> Result<Image> {
        if patch.is_empty() {
            return Err(PixlyError::BadRequest("No data".to_string()));
        }
        let mut rows = self.rows.write().await;
        if !rows.by_id.contains_key(&id) {
            return Err(PixlyError::image_not_found());
        }
        if let Some(name) = &patch.name {
            if rows.name_taken(name, Some(id)) {
                return Err(PixlyError::duplicate_image(name));
            }
        }
        let image = rows
            .by_id
            .get_mut(&id)
            .ok_or_else(PixlyError::image_not_found)?;
        patch.apply_to(image);
        Ok(image.clone())
    }

    async fn remove(&self, id: i32) -> Result<()> {
        self.rows
            .write()
            .await
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or_else(PixlyError::image_not_found)
    }
}
