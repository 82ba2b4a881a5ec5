use pixly_core::{ImageFilter, PixlyError, Result};

pub struct QueryPart {
    pub clause: String,
    pub values: Vec<String>,
}

/// Client-facing field names whose storage column is spelled differently.
/// Any field not listed maps to a column of the same name.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("imageLocation", "image_location"),
    ("imageUrl", "image_url"),
];

fn column_for<'a>(field: &'a str, aliases: &[(&'a str, &'a str)]) -> &'a str {
    aliases
        .iter()
        .find(|(external, _)| *external == field)
        .map(|(_, column)| *column)
        .unwrap_or(field)
}

/// Build a `WHERE` clause of case-insensitive substring matches.
///
/// Predicates are emitted in the order style, name, imageLocation, camera,
/// numbered from `$1`. Returns an empty clause when no filter is set, in
/// which case the caller must leave the clause out entirely.
pub fn filter_where(filter: &ImageFilter) -> QueryPart {
    let candidates = [
        ("style", &filter.style),
        ("name", &filter.name),
        ("image_location", &filter.image_location),
        ("camera", &filter.camera),
    ];

    let mut predicates = Vec::new();
    let mut values = Vec::new();

    for (column, val) in candidates {
        let Some(val) = val.as_deref().filter(|v| !v.is_empty()) else {
            continue;
        };
        values.push(format!("%{val}%"));
        predicates.push(format!("{column} ILIKE ${}", values.len()));
    }

    if predicates.is_empty() {
        return QueryPart {
            clause: String::new(),
            values,
        };
    }

    QueryPart {
        clause: format!("WHERE {}", predicates.join(" AND ")),
        values,
    }
}

/// Build the `SET` list of a partial update.
///
/// `data` holds `(field, value)` pairs; each becomes `"column" = $n` in the
/// order given, with `aliases` translating field names to columns. The row
/// key can then be bound at `$values.len() + 1`.
///
/// Fails with `BadRequest` when `data` is empty.
pub fn sql_for_partial_update(
    data: &[(&str, &str)],
    aliases: &[(&str, &str)],
) -> Result<QueryPart> {
    if data.is_empty() {
        return Err(PixlyError::BadRequest("No data".to_string()));
    }

    let mut fragments = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (field, val)) in data.iter().enumerate() {
        fragments.push(format!("\"{}\" = ${}", column_for(field, aliases), idx + 1));
        values.push(val.to_string());
    }

    Ok(QueryPart {
        clause: fragments.join(", "),
        values,
    })
}
