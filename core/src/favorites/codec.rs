// Favorites wire format
//
// v1: {"version":1,"favorites":[...]}
// v0: bare JSON array, as written by earlier app builds. Read-only; the next
//     write upgrades it to v1.

use super::record::FavoriteRecord;
use super::set::FavoritesSet;
use crate::FavoritesError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    favorites: &'a [FavoriteRecord],
}

/// Serialize the set in the current schema
pub fn encode(set: &FavoritesSet) -> Result<Vec<u8>, FavoritesError> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        favorites: set.as_slice(),
    };
    serde_json::to_vec(&envelope)
        .map_err(|e| FavoritesError::CorruptPersistedData(format!("encode failed: {}", e)))
}

/// Parse a stored value. Blank text counts as an empty set; anything else
/// that is not a favorites list in a known schema is an error.
pub fn decode(bytes: &[u8]) -> Result<FavoritesSet, FavoritesError> {
    decode_counting(bytes).map(|(set, _)| set)
}

/// Like `decode`, also returning how many duplicate ids were collapsed.
/// Reporting them is left to the caller, which knows whether a rewrite
/// is about to follow.
pub fn decode_counting(bytes: &[u8]) -> Result<(FavoritesSet, usize), FavoritesError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FavoritesError::CorruptPersistedData(format!("not UTF-8: {}", e)))?;
    if text.trim().is_empty() {
        return Ok((FavoritesSet::new(), 0));
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| FavoritesError::CorruptPersistedData(e.to_string()))?;

    let (version, records) = match value {
        Value::Array(items) => (0, Value::Array(items)),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    FavoritesError::CorruptPersistedData("missing schema version".to_string())
                })?;
            let version = u32::try_from(version)
                .map_err(|_| FavoritesError::UnsupportedSchemaVersion(u32::MAX))?;
            if version > SCHEMA_VERSION {
                return Err(FavoritesError::UnsupportedSchemaVersion(version));
            }
            if version < 1 {
                // v0 only ever existed as a bare array
                return Err(FavoritesError::CorruptPersistedData(format!(
                    "envelope claims schema version {}",
                    version
                )));
            }
            let records = map.remove("favorites").ok_or_else(|| {
                FavoritesError::CorruptPersistedData("missing favorites list".to_string())
            })?;
            (version, records)
        }
        other => {
            return Err(FavoritesError::CorruptPersistedData(format!(
                "expected a list of favorites, found {}",
                json_kind(&other)
            )))
        }
    };

    let records: Vec<FavoriteRecord> = serde_json::from_value(records)
        .map_err(|e| FavoritesError::CorruptPersistedData(e.to_string()))?;

    if version < SCHEMA_VERSION {
        debug!("Read legacy v{} favorites ({} records)", version, records.len());
    }

    Ok(FavoritesSet::dedup_from(records))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
