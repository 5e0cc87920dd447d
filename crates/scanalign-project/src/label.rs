use std::collections::HashSet;

/// Normalize a label or file stem for matching: trim whitespace and casefold.
pub fn norm_name(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Make `desired` unique against a set of normalized (lowercase) labels by
/// appending a numeric suffix `_02`, `_03`, ... on collision.
///
/// The caller is responsible for inserting the returned label's normalized
/// form into `existing` so later assignments in the same run see it.
pub fn make_unique_label(desired: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(&norm_name(desired)) {
        return desired.to_string();
    }

    let mut i = 2u32;
    loop {
        let candidate = format!("{desired}_{i:02}");
        if !existing.contains(&norm_name(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}
