use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use bytes::buf::Reader;
use bytes::{Buf, Bytes};

use crate::error::{StoreError, StoreResult};
use crate::traits::StorageClient;

/// An object held by [`InMemoryStorageClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-memory, HashMap-based storage client.
///
/// Intended for tests and embedding. Objects sit behind a `RwLock` keyed by
/// `(container, key)`; payloads are `Bytes`, so reads share the stored buffer
/// instead of copying it.
///
/// Faults queued with [`fail_next`](Self::fail_next) are returned, one per
/// call and in order, by the next `put_object`/`get_object` calls before the
/// store is touched.
pub struct InMemoryStorageClient {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    faults: Mutex<VecDeque<StoreError>>,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl InMemoryStorageClient {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            faults: Mutex::new(VecDeque::new()),
            puts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        }
    }

    /// Queue an error to be returned by the next put or get.
    pub fn fail_next(&self, err: StoreError) {
        self.faults.lock().expect("lock poisoned").push_back(err);
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|obj| obj.data.len() as u64)
            .sum()
    }

    /// Look up an object without going through the client interface.
    pub fn object(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    /// Sorted keys stored in `container`.
    pub fn keys(&self, container: &str) -> Vec<String> {
        let map = self.objects.read().expect("lock poisoned");
        let mut keys: Vec<String> = map
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Remove all objects and pending faults.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
        self.faults.lock().expect("lock poisoned").clear();
    }

    /// Number of `put_object` calls seen, failed ones included.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `get_object` calls seen, failed ones included.
    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    fn take_fault(&self) -> StoreResult<()> {
        match self.faults.lock().expect("lock poisoned").pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageClient for InMemoryStorageClient {
    type Error = StoreError;
    type Body = Reader<Bytes>;

    fn put_object(
        &self,
        container: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> StoreResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.take_fault()?;
        let object = StoredObject {
            data: Bytes::copy_from_slice(body),
            content_type: content_type.to_string(),
        };
        self.objects
            .write()
            .expect("lock poisoned")
            .insert((container.to_string(), key.to_string()), object);
        Ok(())
    }

    fn get_object(&self, container: &str, key: &str) -> StoreResult<Self::Body> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.take_fault()?;
        let map = self.objects.read().expect("lock poisoned");
        match map.get(&(container.to_string(), key.to_string())) {
            Some(obj) => Ok(obj.data.clone().reader()),
            None => Err(StoreError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            }),
        }
    }

    fn is_retryable(&self, err: &StoreError) -> bool {
        err.is_transient()
    }
}

impl std::fmt::Debug for InMemoryStorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorageClient")
            .field("object_count", &self.len())
            .finish()
    }
}
