// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Identifier sanitizing for generated Liquid variable names.

/// Longest key accepted as part of a generated variable name.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Turns a setting or block key into a safe Liquid identifier fragment.
///
/// Returns `None` when the key is empty, too long, or does not start with an
/// ASCII letter or underscore. Every other character outside `[A-Za-z0-9_]`
/// becomes `_`. Sanitizing an already sanitized identifier is a no-op.
///
/// ```
/// use sectional::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("my-key").as_deref(), Some("my_key"));
/// assert_eq!(sanitize_identifier("123abc"), None);
/// ```
pub fn sanitize_identifier(key: &str) -> Option<String> {
    let first = key.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if key.chars().count() > MAX_IDENTIFIER_LEN {
        return None;
    }

    Some(
        key.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect(),
    )
}

/// Checks a store handle (`[A-Za-z0-9-]`, at most 255 chars).
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.len() <= 255
        && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Checks a section id used in the isolation container (`[A-Za-z0-9_-]`, at most 64 chars).
pub fn is_valid_section_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
