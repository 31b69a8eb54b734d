use std::io::Read;
use std::sync::Arc;

/// The storage capability the facade depends on.
///
/// Only three things are required of a backend:
/// - `put_object` stores bytes under a key, overwriting any previous object
/// - `get_object` opens a body stream for a key
/// - `is_retryable` classifies the backend's own errors as transient or not
///
/// The facade never inspects concrete error types beyond `is_retryable`, so a
/// backend stays correct as its error taxonomy grows.
pub trait StorageClient: Send + Sync {
    /// Error type produced by this backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Response body returned by `get_object`. Dropping it releases the
    /// underlying resource.
    type Body: Read;

    /// Store `body` at `container`/`key` with the given content type.
    fn put_object(
        &self,
        container: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), Self::Error>;

    /// Open the object at `container`/`key` for reading.
    fn get_object(&self, container: &str, key: &str) -> Result<Self::Body, Self::Error>;

    /// Whether `err` describes a transient condition worth retrying.
    fn is_retryable(&self, err: &Self::Error) -> bool;
}

impl<C: StorageClient> StorageClient for Arc<C> {
    type Error = C::Error;
    type Body = C::Body;

    fn put_object(
        &self,
        container: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), Self::Error> {
        (**self).put_object(container, key, body, content_type)
    }

    fn get_object(&self, container: &str, key: &str) -> Result<Self::Body, Self::Error> {
        (**self).get_object(container, key)
    }

    fn is_retryable(&self, err: &Self::Error) -> bool {
        (**self).is_retryable(err)
    }
}
