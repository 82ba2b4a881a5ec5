use serde::{Deserialize, Serialize};

/// A stored image record, as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i32,
    pub name: String,
    pub camera: String,
    pub style: String,
    pub image_location: String,
    pub image_url: String,
}

/// Style assigned by storage when a new image doesn't name one.
pub const DEFAULT_STYLE: &str = "normal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewImage {
    pub name: String,
    pub camera: String,
    pub image_location: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl NewImage {
    pub fn new(
        name: impl Into<String>,
        camera: impl Into<String>,
        image_location: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            camera: camera.into(),
            image_location: image_location.into(),
            image_url: image_url.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Search criteria for listing images. Every field is a case-insensitive
/// substring match; `None` and empty strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageFilter {
    pub name: Option<String>,
    pub style: Option<String>,
    pub image_location: Option<String>,
    pub camera: Option<String>,
}

impl ImageFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn image_location(mut self, image_location: impl Into<String>) -> Self {
        self.image_location = Some(image_location.into());
        self
    }

    pub fn camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = Some(camera.into());
        self
    }
}

/// Fields to change on an existing image. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagePatch {
    pub name: Option<String>,
    pub style: Option<String>,
    pub camera: Option<String>,
    pub image_location: Option<String>,
    pub image_url: Option<String>,
}

impl ImagePatch {
    /// Present fields as `(external name, value)` pairs, in declaration order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("style", &self.style),
            ("camera", &self.camera),
            ("imageLocation", &self.image_location),
            ("imageUrl", &self.image_url),
        ]
        .into_iter()
        .filter_map(|(key, val)| val.as_deref().map(|v| (key, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Overwrite the fields of `image` that this patch names.
    pub fn apply_to(&self, image: &mut Image) {
        if let Some(name) = &self.name {
            image.name = name.clone();
        }
        if let Some(style) = &self.style {
            image.style = style.clone();
        }
        if let Some(camera) = &self.camera {
            image.camera = camera.clone();
        }
        if let Some(location) = &self.image_location {
            image.image_location = location.clone();
        }
        if let Some(url) = &self.image_url {
            image.image_url = url.clone();
        }
    }
}
