use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use inflight_naming::{ContentHashNaming, NamingError, NamingStrategy};
use inflight_store::StorageClient;
use inflight_transfer::{Attempt, RetryPolicy, TransferError};
use inflight_types::{object_key, Reference, TypeError, DEFAULT_CONTENT_TYPE};
use tracing::{debug, debug_span};

use crate::error::{InflightError, InflightResult, Operation};

/// Content-addressable write/read facade over a storage client.
///
/// Every instance is bound to one container and one namespace path. Payloads
/// are named by the configured [`NamingStrategy`] (content hash by default)
/// and stored at `container/path/name` with a fixed content type.
///
/// Configuration is read-only once built, so an `Inflight` can be shared
/// across threads (e.g. in an `Arc`) as long as its client can.
/// [`set_naming`](Self::set_naming) needs `&mut self`; swapping the strategy
/// while other threads hold the facade requires the caller's own lock.
pub struct Inflight<C> {
    container: String,
    path: String,
    client: C,
    naming: Arc<dyn NamingStrategy>,
    content_type: String,
    retry: RetryPolicy,
}

impl<C: StorageClient> Inflight<C> {
    /// Facade with content-hash naming, the default content type and the
    /// default retry policy.
    pub fn new(
        container: impl Into<String>,
        path: impl Into<String>,
        client: C,
    ) -> Result<Self, TypeError> {
        Self::builder(container, path, client).build()
    }

    /// Start configuring a facade.
    pub fn builder(
        container: impl Into<String>,
        path: impl Into<String>,
        client: C,
    ) -> InflightBuilder<C> {
        InflightBuilder {
            container: container.into(),
            path: path.into(),
            client,
            naming: Arc::new(ContentHashNaming::new()),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Name `payload`, store it, and return where it went.
    ///
    /// The name is generated once, before the first attempt; retries reuse
    /// the same key. On failure no reference is returned and the backend may
    /// or may not hold the object.
    pub fn write(&self, payload: &[u8]) -> InflightResult<Reference, C::Error> {
        let name = self.naming.name_for(payload)?;
        if name.is_empty() {
            return Err(NamingError::EmptyName.into());
        }

        let reference = Reference::new(self.container.as_str(), self.path.as_str(), name)?;
        let key = reference.key()?;

        let span = debug_span!("transfer", op = "put", container = %self.container, key = %key);
        let _guard = span.enter();

        self.retry
            .run(|_| {
                self.client
                    .put_object(&self.container, &key, payload, &self.content_type)
                    .map_err(|err| self.classify(err))
            })
            .map_err(|err| into_inflight_error(Operation::Put, &self.container, &key, err))?;

        debug!(len = payload.len(), "payload written");
        Ok(reference)
    }

    /// Fetch the bytes stored under `name` in this facade's container and path.
    ///
    /// Callers that want an empty payload on failure can use
    /// `read(name).unwrap_or_default()`.
    pub fn read(&self, name: &str) -> InflightResult<Vec<u8>, C::Error> {
        let key = object_key(&self.path, name)?;
        self.fetch(&self.container, &key)
    }

    /// Fetch the bytes behind a reference, using its own container and path.
    pub fn read_ref(&self, reference: &Reference) -> InflightResult<Vec<u8>, C::Error> {
        reference.validate()?;
        let key = reference.key()?;
        self.fetch(reference.container(), &key)
    }

    /// Replace the naming strategy.
    pub fn set_naming(&mut self, naming: impl NamingStrategy + 'static) {
        self.naming = Arc::new(naming);
    }

    /// The container objects are written to.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The namespace path objects are grouped under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Content type stamped on every write.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The retry policy wrapping each operation.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The underlying storage client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn fetch(&self, container: &str, key: &str) -> InflightResult<Vec<u8>, C::Error> {
        let span = debug_span!("transfer", op = "get", container = %container, key = %key);
        let _guard = span.enter();

        let data = self
            .retry
            .run(|_| {
                let mut body = self
                    .client
                    .get_object(container, key)
                    .map_err(|err| self.classify(err))?;
                let mut data = Vec::new();
                // The request already succeeded; re-issuing it could mask a
                // partial read.
                body.read_to_end(&mut data)
                    .map_err(|err| Attempt::Permanent(Failure::Body(err)))?;
                Ok(data)
            })
            .map_err(|err| into_inflight_error(Operation::Get, container, key, err))?;

        debug!(len = data.len(), "payload read");
        Ok(data)
    }

    fn classify(&self, err: C::Error) -> Attempt<Failure<C::Error>> {
        let retryable = self.client.is_retryable(&err);
        Attempt::classify(Failure::Backend(err), retryable)
    }
}

impl<C> fmt::Debug for Inflight<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inflight")
            .field("container", &self.container)
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Inflight`].
pub struct InflightBuilder<C> {
    container: String,
    path: String,
    client: C,
    naming: Arc<dyn NamingStrategy>,
    content_type: String,
    retry: RetryPolicy,
}

impl<C: StorageClient> InflightBuilder<C> {
    /// Use `naming` to derive object names.
    #[must_use]
    pub fn naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Use an already shared naming strategy.
    #[must_use]
    pub fn shared_naming(mut self, naming: Arc<dyn NamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    /// Stamp writes with `content_type` instead of the default.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Wrap operations in `retry` instead of the default policy.
    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration and build the facade.
    pub fn build(self) -> Result<Inflight<C>, TypeError> {
        if self.container.is_empty() {
            return Err(TypeError::EmptyField { field: "container" });
        }
        if self.path.is_empty() {
            return Err(TypeError::EmptyField { field: "path" });
        }
        if self.content_type.is_empty() {
            return Err(TypeError::EmptyField {
                field: "content_type",
            });
        }
        Ok(Inflight {
            container: self.container,
            path: self.path,
            client: self.client,
            naming: self.naming,
            content_type: self.content_type,
            retry: self.retry,
        })
    }
}

/// A failed attempt: either the backend refused or the body broke mid-read.
#[derive(Debug)]
enum Failure<E> {
    Backend(E),
    Body(io::Error),
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "{err}"),
            Self::Body(err) => write!(f, "body read failed: {err}"),
        }
    }
}

fn into_inflight_error<E>(
    op: Operation,
    container: &str,
    key: &str,
    err: TransferError<Failure<E>>,
) -> InflightError<E> {
    let container = container.to_string();
    let key = key.to_string();
    match err {
        TransferError::Permanent {
            attempts,
            source: Failure::Backend(source),
        } => InflightError::Permanent {
            op,
            container,
            key,
            attempts,
            source,
        },
        TransferError::Exhausted {
            attempts,
            elapsed,
            source: Failure::Backend(source),
        } => InflightError::Exhausted {
            op,
            container,
            key,
            attempts,
            elapsed,
            source,
        },
        TransferError::Permanent {
            attempts,
            source: Failure::Body(source),
        }
        | TransferError::Exhausted {
            attempts,
            source: Failure::Body(source),
            ..
        } => InflightError::BodyRead {
            container,
            key,
            attempts,
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inflight_naming::RandomNaming;
    use inflight_store::{InMemoryStorageClient, StoreError};
    use inflight_transfer::ExponentialBackoff;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(ExponentialBackoff::immediate()).with_max_attempts(5)
    }

    fn facade(client: Arc<InMemoryStorageClient>) -> Inflight<Arc<InMemoryStorageClient>> {
        Inflight::builder("a_bucket", "a/key/path", client)
            .retry_policy(fast_retry())
            .build()
            .unwrap()
    }

    fn timeout() -> StoreError {
        StoreError::Timeout("RequestTimeout".into())
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn new_keeps_configuration() {
        let inflight = Inflight::new("bucket", "key/path", InMemoryStorageClient::new()).unwrap();
        assert_eq!(inflight.container(), "bucket");
        assert_eq!(inflight.path(), "key/path");
        assert_eq!(inflight.content_type(), DEFAULT_CONTENT_TYPE);
        assert_eq!(inflight.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn empty_container_or_path_is_rejected() {
        assert!(Inflight::new("", "p", InMemoryStorageClient::new()).is_err());
        assert!(Inflight::new("c", "", InMemoryStorageClient::new()).is_err());
        assert!(Inflight::builder("c", "p", InMemoryStorageClient::new())
            .content_type("")
            .build()
            .is_err());
    }

    // -----------------------------------------------------------------------
    // Write
    // -----------------------------------------------------------------------

    #[test]
    fn write_stores_under_path_and_name() {
        let client = Arc::new(InMemoryStorageClient::new());
        let inflight = facade(client.clone());

        let reference = inflight.write(b"hi").unwrap();
        assert_eq!(reference.container(), "a_bucket");
        assert_eq!(reference.path(), "a/key/path");
        assert!(!reference.name().is_empty());

        let key = format!("a/key/path/{}", reference.name());
        let stored = client.object("a_bucket", &key).unwrap();
        assert_eq!(&stored.data[..], b"hi");
        assert_eq!(stored.content_type, "binary/octet-stream");
    }

    #[test]
    fn write_retries_after_timeout() {
        let client = Arc::new(InMemoryStorageClient::new());
        client.fail_next(timeout());
        let inflight = facade(client.clone());

        let reference = inflight.write(b"hi").unwrap();
        assert_eq!(reference.container(), "a_bucket");
        assert_eq!(reference.path(), "a/key/path");
        assert!(!reference.name().is_empty());
        assert_eq!(client.put_calls(), 2);
    }

    #[test]
    fn write_permanent_failure_is_not_retried() {
        let client = Arc::new(InMemoryStorageClient::new());
        client.fail_next(StoreError::AccessDenied {
            container: "a_bucket".into(),
            reason: "bad credentials".into(),
        });
        let inflight = facade(client.clone());

        let err = inflight.write(b"hi").unwrap_err();
        assert!(matches!(
            err,
            InflightError::Permanent {
                op: Operation::Put,
                attempts: 1,
                source: StoreError::AccessDenied { .. },
                ..
            }
        ));
        assert_eq!(client.put_calls(), 1);
        assert!(client.is_empty());
    }

    #[test]
    fn write_exhaustion_surfaces_last_error() {
        let client = Arc::new(InMemoryStorageClient::new());
        for _ in 0..5 {
            client.fail_next(timeout());
        }
        let inflight = facade(client.clone());

        let err = inflight.write(b"hi").unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 5);
        assert!(matches!(err.backend_error(), Some(StoreError::Timeout(_))));
        assert_eq!(client.put_calls(), 5);
    }

    #[test]
    fn naming_failure_never_contacts_backend() {
        let client = Arc::new(InMemoryStorageClient::new());
        let inflight = Inflight::builder("a_bucket", "a/key/path", client.clone())
            .naming(|_: &[u8]| -> Result<String, NamingError> { Err(NamingError::custom("no name")) })
            .retry_policy(fast_retry())
            .build()
            .unwrap();

        let err = inflight.write(b"hi").unwrap_err();
        assert!(matches!(err, InflightError::Naming(NamingError::Custom(_))));
        assert_eq!(err.attempts(), 0);
        assert_eq!(client.put_calls(), 0);
    }

    #[test]
    fn entropy_failure_is_permanent() {
        let client = Arc::new(InMemoryStorageClient::new());
        let mut inflight = facade(client.clone());
        inflight.set_naming(RandomNaming::with_source(|_| {
            Err(rand_error())
        }));

        let err = inflight.write(b"hi").unwrap_err();
        assert!(matches!(err, InflightError::Naming(NamingError::Entropy(_))));
        assert_eq!(client.put_calls(), 0);
    }

    fn rand_error() -> rand::Error {
        rand::Error::new(io::Error::other("entropy exhausted"))
    }

    #[test]
    fn empty_name_is_a_naming_error() {
        let mut inflight = facade(Arc::new(InMemoryStorageClient::new()));
        inflight.set_naming(|_: &[u8]| -> Result<String, NamingError> { Ok(String::new()) });
        assert!(matches!(
            inflight.write(b"hi").unwrap_err(),
            InflightError::Naming(NamingError::EmptyName)
        ));
    }

    #[test]
    fn injected_name_is_used_verbatim() {
        let client = Arc::new(InMemoryStorageClient::new());
        let mut inflight = facade(client.clone());
        inflight.set_naming(|_: &[u8]| -> Result<String, NamingError> { Ok("fixed-name".into()) });

        let reference = inflight.write(b"hi").unwrap();
        assert_eq!(reference.name(), "fixed-name");
        assert!(client.object("a_bucket", "a/key/path/fixed-name").is_some());
    }

    #[test]
    fn content_hash_names_are_deterministic() {
        let inflight = facade(Arc::new(InMemoryStorageClient::new()));
        let first = inflight.write(b"same bytes").unwrap();
        let second = inflight.write(b"same bytes").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn random_names_differ_for_identical_payloads() {
        let client = Arc::new(InMemoryStorageClient::new());
        let mut inflight = facade(client.clone());
        inflight.set_naming(RandomNaming::new());

        let first = inflight.write(b"same bytes").unwrap();
        let second = inflight.write(b"same bytes").unwrap();
        assert_ne!(first.name(), second.name());
        assert_eq!(client.len(), 2);
    }

    #[test]
    fn retried_write_reuses_generated_name() {
        let client = Arc::new(InMemoryStorageClient::new());
        client.fail_next(timeout());
        client.fail_next(timeout());
        let names = Arc::new(AtomicUsize::new(0));
        let counter = names.clone();
        let mut inflight = facade(client.clone());
        inflight.set_naming(move |_: &[u8]| -> Result<String, NamingError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(RandomNaming::new().name_for(b"")?)
        });

        inflight.write(b"hi").unwrap();
        assert_eq!(names.load(Ordering::SeqCst), 1);
        assert_eq!(client.put_calls(), 3);
        assert_eq!(client.len(), 1);
    }

    #[test]
    fn custom_content_type_is_applied() {
        let client = Arc::new(InMemoryStorageClient::new());
        let inflight = Inflight::builder("b", "json", client.clone())
            .content_type("application/json")
            .build()
            .unwrap();
        let reference = inflight.write(br#"{"a":1}"#).unwrap();
        let stored = client.object("b", &reference.key().unwrap()).unwrap();
        assert_eq!(stored.content_type, "application/json");
    }

    #[test]
    fn empty_payload_is_accepted() {
        let inflight = facade(Arc::new(InMemoryStorageClient::new()));
        let reference = inflight.write(b"").unwrap();
        assert!(inflight.read(reference.name()).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    #[test]
    fn read_returns_stored_bytes() {
        let client = Arc::new(InMemoryStorageClient::new());
        client
            .put_object("a_bucket", "a/key/path/greeting", b"Hello, World!", "t")
            .unwrap();
        let inflight = facade(client);
        assert_eq!(inflight.read("greeting").unwrap(), b"Hello, World!");
    }

    #[test]
    fn read_retries_after_timeout() {
        let client = Arc::new(InMemoryStorageClient::new());
        client
            .put_object("a_bucket", "a/key/path/greeting", b"Hello, World!", "t")
            .unwrap();
        client.fail_next(timeout());
        let inflight = facade(client.clone());

        assert_eq!(inflight.read("greeting").unwrap(), b"Hello, World!");
        assert_eq!(client.get_calls(), 2);
    }

    #[test]
    fn read_missing_object_is_permanent() {
        let client = Arc::new(InMemoryStorageClient::new());
        let inflight = facade(client.clone());

        let result = inflight.read("missing-object");
        let err = result.as_ref().unwrap_err();
        assert!(matches!(
            err,
            InflightError::Permanent {
                op: Operation::Get,
                source: StoreError::NotFound { .. },
                ..
            }
        ));
        assert_eq!(client.get_calls(), 1);
        assert!(result.unwrap_or_default().is_empty());
    }

    #[test]
    fn read_ref_uses_reference_location() {
        let client = Arc::new(InMemoryStorageClient::new());
        client.put_object("other", "elsewhere/obj", b"data", "t").unwrap();
        let inflight = facade(client);

        let reference = Reference::new("other", "elsewhere", "obj").unwrap();
        assert_eq!(inflight.read_ref(&reference).unwrap(), b"data");
    }

    // -----------------------------------------------------------------------
    // Body failures
    // -----------------------------------------------------------------------

    struct BrokenBody;

    impl Read for BrokenBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    /// Serves bodies that fail mid-read, counting how many were opened.
    #[derive(Default)]
    struct BrokenBodyClient {
        gets: AtomicUsize,
    }

    impl StorageClient for BrokenBodyClient {
        type Error = StoreError;
        type Body = BrokenBody;

        fn put_object(&self, _: &str, _: &str, _: &[u8], _: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_object(&self, _: &str, _: &str) -> Result<BrokenBody, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            Ok(BrokenBody)
        }

        fn is_retryable(&self, err: &StoreError) -> bool {
            err.is_transient()
        }
    }

    #[test]
    fn body_read_failure_is_not_retried() {
        let client = Arc::new(BrokenBodyClient::default());
        let inflight = Inflight::builder("b", "p", client.clone())
            .retry_policy(fast_retry())
            .build()
            .unwrap();

        let err = inflight.read("obj").unwrap_err();
        assert!(matches!(err, InflightError::BodyRead { attempts: 1, .. }));
        assert_eq!(client.gets.load(Ordering::SeqCst), 1);
    }

    // -----------------------------------------------------------------------
    // Sharing
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_writes_share_one_facade() {
        let client = Arc::new(InMemoryStorageClient::new());
        let inflight = facade(client.clone());

        std::thread::scope(|s| {
            for i in 0..8u8 {
                let inflight = &inflight;
                s.spawn(move || {
                    let reference = inflight.write(&[i; 16]).unwrap();
                    assert_eq!(inflight.read(reference.name()).unwrap(), vec![i; 16]);
                });
            }
        });
        assert_eq!(client.len(), 8);
    }

    proptest! {
        #[test]
        fn write_then_read_roundtrips(payload in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let inflight = facade(Arc::new(InMemoryStorageClient::new()));
            let reference = inflight.write(&payload).unwrap();
            prop_assert_eq!(inflight.read(reference.name()).unwrap(), payload);
        }
    }
}
