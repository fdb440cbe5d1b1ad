//! `${...}` placeholder interpolation against a POM property map.

use std::collections::HashMap;

/// Nested property references deeper than this are left as-is.
const MAX_INTERPOLATION_DEPTH: usize = 8;

/// Replaces every `${key}` in `value` with its property.
///
/// A placeholder whose key is not defined is replaced by the bare key, so
/// `${missing.version}` becomes `missing.version`. Property values that
/// themselves contain placeholders are expanded too, up to a fixed depth.
/// An unterminated `${` is kept literally.
pub fn interpolate(value: &str, properties: &HashMap<String, String>) -> String {
    interpolate_at_depth(value, properties, 0)
}

fn interpolate_at_depth(value: &str, properties: &HashMap<String, String>, depth: usize) -> String {
    if depth >= MAX_INTERPOLATION_DEPTH || !value.contains("${") {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match properties.get(key) {
            Some(resolved) => {
                out.push_str(&interpolate_at_depth(resolved, properties, depth + 1));
            }
            None => {
                tracing::trace!("unresolved property ${{{}}}, using key", key);
                out.push_str(key);
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
