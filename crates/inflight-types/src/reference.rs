use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::key::object_key;

/// Location of a stored payload, broken down by container, path and object.
///
/// ```text
/// container = "my-bucket"
/// path      = "some/path/within"
/// name      = "an-object.json"
/// => my-bucket/some/path/within/an-object.json
/// ```
///
/// References are plain values: a fresh one is returned by every successful
/// write and can be persisted by the caller for a later read. On the wire the
/// fields are named `bucket`, `path` and `object`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "bucket", alias = "container")]
    container: String,
    path: String,
    #[serde(rename = "object", alias = "name")]
    name: String,
}

impl Reference {
    /// Build a reference, rejecting empty fields.
    pub fn new(
        container: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let reference = Self {
            container: container.into(),
            path: path.into(),
            name: name.into(),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Check that all three fields are non-empty.
    ///
    /// Deserialized references bypass [`Reference::new`], so callers reading
    /// them from untrusted input should validate before use.
    pub fn validate(&self) -> Result<(), TypeError> {
        for (field, value) in [
            ("container", &self.container),
            ("path", &self.path),
            ("name", &self.name),
        ] {
            if value.is_empty() {
                return Err(TypeError::EmptyField { field });
            }
        }
        Ok(())
    }

    /// The top-level storage namespace.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The namespace path objects are grouped under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The object name produced by the naming strategy.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The physical key inside the container.
    pub fn key(&self) -> Result<String, TypeError> {
        object_key(&self.path, &self.name)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Ok(key) => write!(f, "{}/{}", self.container, key.trim_start_matches('/')),
            Err(_) => write!(f, "{}/{}/{}", self.container, self.path, self.name),
        }
    }
}
