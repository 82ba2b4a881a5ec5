pub mod config;
pub mod error;
pub mod image;
pub mod memory;
pub mod testing;
pub mod validate;

pub use config::{AppConfig, ConfigError, ServerConfig};
pub use error::{ErrorKind, PixlyError, Result};
pub use image::{Image, ImageFilter, ImagePatch, NewImage, DEFAULT_STYLE};
pub use memory::MemoryImageStore;
pub use validate::{validate, Schema};

/// A loosely-typed JSON object, as received from clients before validation.
pub type Stash = serde_json::Map<String, serde_json::Value>;

/// The image catalog. Every operation touches at most one row, except
/// `find_all` which is read-only.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert a new image after checking its name is not taken.
    ///
    /// Fails with `BadRequest` on a duplicate name, whether caught by the
    /// pre-check or by the storage uniqueness constraint.
    async fn add(&self, image: NewImage) -> Result<Image>;

    /// Insert without the duplicate pre-check; only the storage uniqueness
    /// constraint guards the name.
    async fn insert(&self, image: NewImage) -> Result<Image>;

    /// All images matching `filter`, ordered by name.
    async fn find_all(&self, filter: &ImageFilter) -> Result<Vec<Image>>;

    async fn get(&self, id: i32) -> Result<Image>;

    /// Apply a partial update. An empty patch is a `BadRequest`.
    async fn update(&self, id: i32, patch: &ImagePatch) -> Result<Image>;

    async fn remove(&self, id: i32) -> Result<()>;
}
