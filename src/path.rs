//! Slash-delimited path resolution over a [`ConfigValue`] tree.
//!
//! `"/server/listen"` addresses `root["server"]["listen"]`. The text before the
//! first `/` is ignored, and an empty segment (as in `"/"` or `"/server/"`)
//! stays on the current node.

use crate::error::{ConfigError, Result};
use crate::value::ConfigValue;
use log::trace;

/// Finds the node addressed by `path` under `root`.
///
/// # Errors
/// `NotAnObject` names the first segment whose parent is not an object.
/// `NodeNotFound` is returned when the path ends on a missing key or a `null`.
pub fn resolve<'a>(root: &'a ConfigValue, path: &str) -> Result<&'a ConfigValue> {
    trace!("resolving configuration path `{path}`");

    // `None` stands for a missing key.
    let mut current = Some(root);
    for segment in path.split('/').skip(1) {
        if segment.is_empty() {
            continue;
        }
        let Some(ConfigValue::Object(map)) = current else {
            return Err(ConfigError::NotAnObject {
                segment: segment.to_string(),
            });
        };
        current = map.get(segment);
    }

    match current {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ConfigError::NodeNotFound),
    }
}
