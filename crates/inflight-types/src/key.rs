//! Physical object key construction.
//!
//! Keys are built with forward-slash semantics on every host platform:
//! - Empty segments and `.` segments are dropped
//! - `..` removes the preceding segment (or is dropped at the root)
//! - A leading `/` on the namespace path is preserved
//! - An empty namespace path yields just the object name

use crate::error::TypeError;

/// Join a namespace path and an object name into a cleaned object key.
///
/// # Examples
///
/// ```
/// use inflight_types::object_key;
///
/// assert_eq!(object_key("a/key/path", "obj").unwrap(), "a/key/path/obj");
/// assert_eq!(object_key("a//b/", "obj").unwrap(), "a/b/obj");
/// assert_eq!(object_key("", "obj").unwrap(), "obj");
/// assert!(object_key("", "").is_err());
/// ```
pub fn object_key(path: &str, name: &str) -> Result<String, TypeError> {
    let rooted = path.starts_with('/') || (path.is_empty() && name.starts_with('/'));
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/').chain(name.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` cannot climb above the root.
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(TypeError::EmptyKey {
            path: path.to_string(),
            name: name.to_string(),
        });
    }

    let joined = segments.join("/");
    Ok(if rooted { format!("/{joined}") } else { joined })
}
