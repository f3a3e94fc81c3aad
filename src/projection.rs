//! Projection Helpers
//!
//! Pure functions mapping vendor representations onto the public schema.

use crate::error::DataSourceError;
use crate::truenas::types::Snapshot;
use glob::Pattern;

/// Normalize a cloud credential provider tag
///
/// Well-known providers map to short tags; anything else is lowercased so
/// consumers can still key on a stable form when TrueNAS adds providers.
/// A missing (empty) tag reports as `unknown`, so the result is never empty.
pub fn normalize_provider_type(provider: &str) -> String {
    match provider {
        "" => "unknown".to_string(),
        "S3" => "s3".to_string(),
        "B2" => "b2".to_string(),
        "GOOGLE_CLOUD_STORAGE" => "gcs".to_string(),
        "AZUREBLOB" => "azure".to_string(),
        other => other.to_lowercase(),
    }
}

/// The API reports unset optional strings as `""`; surface those as null
pub fn empty_to_null(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decimal form of a numeric API identifier
pub fn numeric_id(id: u64) -> String {
    id.to_string()
}

/// Composite dataset identifier `pool/path`, no normalization applied
pub fn dataset_id(pool: &str, path: &str) -> String {
    format!("{}/{}", pool, path)
}

/// Whether a snapshot taken on `dataset` belongs to the requested scope
///
/// Recursive scope includes descendants, matched on a `/` boundary so that
/// `tank/data` never claims `tank/datasets`.
pub fn in_dataset_scope(dataset: &str, dataset_id: &str, recursive: bool) -> bool {
    if dataset == dataset_id {
        return true;
    }
    recursive
        && dataset
            .strip_prefix(dataset_id)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Compile a shell-style snapshot name pattern (`*`, `?`, `[set]`)
pub fn compile_name_pattern(pattern: &str) -> Result<Pattern, DataSourceError> {
    Pattern::new(&collapse_star_runs(pattern)).map_err(|source| {
        DataSourceError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    })
}

/// Fold each run of `*` outside a `[set]` into a single `*`
///
/// `glob` reads `**` as a path-segment wildcard and rejects it mid-segment.
/// Snapshot names hold no `/`, so any run of stars means the same as one.
fn collapse_star_runs(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    // Some(n) while inside a set, n = members seen; `]` as first member is literal
    let mut set: Option<usize> = None;

    for c in pattern.chars() {
        match set {
            Some(members) => {
                set = match c {
                    ']' if members > 0 => None,
                    '!' if members == 0 && out.ends_with('[') => Some(0),
                    _ => Some(members + 1),
                };
            }
            None if c == '[' => set = Some(0),
            None if c == '*' && out.ends_with('*') => continue,
            None => {}
        }
        out.push(c);
    }
    out
}

/// A snapshot is held while any user hold or user reference remains
pub fn snapshot_hold(snapshot: &Snapshot) -> bool {
    !snapshot.holds.is_empty() || snapshot.user_refs() > 0
}

/// API byte counts are unsigned; the schema carries int64
pub fn bytes(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
