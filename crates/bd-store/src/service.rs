// service.rs — EntityService trait and the in-memory reference backend.
//
// The EntityService trait is the persistence collaborator boundary: one
// implementation per entity kind, consumed by the mutation coordinator.
// The query/transaction mechanics behind it (HTTP, SQL, whatever) are
// not this core's business — only the four-call contract is.
//
// InMemoryService is the MVP implementation. It backs the test suites
// and doubles as a demo backend; a real deployment swaps in an HTTP
// client behind the same trait without changing anything upstream.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use bd_entity::Entity;

use crate::error::ServiceError;

/// The persistence collaborator contract for one entity kind.
///
/// Every call suspends the issuing control flow; nothing else in the
/// core blocks while a call is outstanding. `create` and `update` return
/// the record *as persisted* — server-assigned id included — and the
/// store is reconciled from that returned record, never from the
/// submitted form data.
#[async_trait]
pub trait EntityService<T: Entity>: Send + Sync {
    /// Return the current full set.
    async fn list(&self) -> Result<Vec<T>, ServiceError>;

    /// Persist a new record. The payload's id is empty; the returned
    /// record carries the server-assigned one.
    async fn create(&self, payload: T) -> Result<T, ServiceError>;

    /// Replace the record with the given id (full-record semantics).
    async fn update(&self, id: &str, payload: T) -> Result<T, ServiceError>;

    /// Remove the record with the given id. Fails if the id is absent.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// In-memory EntityService implementation.
///
/// Assigns UUID v4 identifiers on create and enforces the same
/// not-found/conflict behavior a real backend would, so tests exercise
/// realistic failure paths.
#[derive(Default)]
pub struct InMemoryService<T: Entity> {
    records: Mutex<Vec<T>>,
}

impl<T: Entity> InMemoryService<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Pre-populate the backend, e.g. with test fixtures.
    pub fn seeded(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // Poisoning only means a panicking thread held the lock; the
        // Vec itself is still coherent.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<T: Entity> EntityService<T> for InMemoryService<T> {
    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, mut payload: T) -> Result<T, ServiceError> {
        let mut records = self.lock();
        if payload.id().is_empty() {
            payload.set_id(Uuid::new_v4().to_string());
        } else if records.iter().any(|r| r.id() == payload.id()) {
            return Err(ServiceError::Conflict {
                kind: T::KIND,
                id: payload.id().to_string(),
            });
        }
        records.push(payload.clone());
        Ok(payload)
    }

    async fn update(&self, id: &str, mut payload: T) -> Result<T, ServiceError> {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                payload.set_id(id.to_string());
                *slot = payload.clone();
                Ok(payload)
            }
            None => Err(ServiceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            }),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(ServiceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
