//! Payload validation for the image endpoints.
//!
//! Each [`Schema`] lists the properties it accepts; anything else is an error.
//! Validation collects every problem rather than stopping at the first one.

use crate::Stash;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    ImageNew,
    ImageSearch,
    ImageUpdate,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Text,
    Url,
}

struct Property {
    name: &'static str,
    required: bool,
    format: Format,
}

const fn prop(name: &'static str, required: bool, format: Format) -> Property {
    Property {
        name,
        required,
        format,
    }
}

const IMAGE_NEW: &[Property] = &[
    prop("name", true, Format::Text),
    prop("camera", true, Format::Text),
    prop("imageLocation", true, Format::Text),
    prop("imageUrl", true, Format::Url),
    prop("style", false, Format::Text),
];

const IMAGE_SEARCH: &[Property] = &[
    prop("name", false, Format::Text),
    prop("style", false, Format::Text),
    prop("imageLocation", false, Format::Text),
    prop("camera", false, Format::Text),
];

const IMAGE_UPDATE: &[Property] = &[
    prop("name", false, Format::Text),
    prop("style", false, Format::Text),
    prop("camera", false, Format::Text),
    prop("imageLocation", false, Format::Text),
    prop("imageUrl", false, Format::Url),
];

impl Schema {
    fn properties(self) -> &'static [Property] {
        match self {
            Schema::ImageNew => IMAGE_NEW,
            Schema::ImageSearch => IMAGE_SEARCH,
            Schema::ImageUpdate => IMAGE_UPDATE,
        }
    }
}

/// Check `payload` against `schema`, returning every violation found.
pub fn validate(schema: Schema, payload: &Stash) -> Result<(), Vec<String>> {
    let props = schema.properties();
    let mut errors = Vec::new();

    for prop in props {
        match payload.get(prop.name) {
            None | Some(Value::Null) => {
                if prop.required {
                    errors.push(format!("\"{}\" is required", prop.name));
                }
            }
            Some(Value::String(s)) => {
                if prop.required && s.is_empty() {
                    errors.push(format!("\"{}\" must not be empty", prop.name));
                } else if let Format::Url = prop.format {
                    if !is_url(s) {
                        errors.push(format!("\"{}\" must be a valid URL", prop.name));
                    }
                }
            }
            Some(_) => errors.push(format!("\"{}\" must be a string", prop.name)),
        }
    }

    for key in payload.keys() {
        if props.iter().any(|p| p.name == key.as_str()) {
            continue;
        }
        if key == "id" && schema == Schema::ImageUpdate {
            errors.push("\"id\" cannot be changed".to_string());
        } else {
            errors.push(format!("\"{key}\" is not an allowed property"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}
