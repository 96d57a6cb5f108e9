// cache.rs — EntityCache: one entity kind's authoritative local list.
//
// Reconciliation rules, uniform across all four kinds:
// - load: wholesale replace from the collaborator; on failure the prior
//   list is untouched (no partial snapshot is ever published)
// - apply_create: append only after the collaborator confirmed — never
//   optimistic, so a failed create cannot leave a phantom row
// - apply_update: replace by id; silent no-op when the id is absent
//   (a concurrent delete may have removed it)
// - apply_delete: remove by id; idempotent
//
// The duplicate-id invariant holds at every entry point: no list ever
// carries the same identifier twice.

use std::collections::HashSet;

use bd_entity::Entity;

use crate::error::StoreError;
use crate::service::EntityService;

/// The cached list for one entity kind.
#[derive(Debug, Clone)]
pub struct EntityCache<T: Entity> {
    records: Vec<T>,
}

impl<T: Entity> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Whether the identifier resolves in the current snapshot.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// List search: case-insensitive substring over each record's text
    /// fields. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&T> {
        let query = query.trim();
        self.records
            .iter()
            .filter(|r| query.is_empty() || r.matches(query))
            .collect()
    }

    /// Fetch the full current list from the collaborator and replace the
    /// cached one wholesale. On any failure the prior list is left
    /// unmodified. Returns the new list length.
    pub async fn load(&mut self, service: &dyn EntityService<T>) -> Result<usize, StoreError> {
        let records = service.list().await?;
        self.replace_all(records)
    }

    /// Replace the cached list with a fresh snapshot, enforcing the
    /// one-copy-per-identifier invariant before publishing anything.
    pub fn replace_all(&mut self, records: Vec<T>) -> Result<usize, StoreError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id().to_string()) {
                return Err(StoreError::DuplicateId {
                    kind: T::KIND,
                    id: record.id().to_string(),
                });
            }
        }
        tracing::debug!(kind = %T::KIND, count = records.len(), "list snapshot replaced");
        self.records = records;
        Ok(self.records.len())
    }

    /// Append a collaborator-confirmed record.
    pub fn apply_create(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId {
                kind: T::KIND,
                id: record.id().to_string(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Replace the matching record in place. Returns false (and changes
    /// nothing) when the id is absent.
    pub fn apply_update(&mut self, record: T) -> bool {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the matching record. Returns whether anything was removed;
    /// deleting an already-absent id is not an error.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::service::InMemoryService;
    use async_trait::async_trait;
    use bd_entity::Area;

    fn area(id: &str, name: &str) -> Area {
        Area {
            id: id.to_string(),
            name: name.to_string(),
            department: "Finance".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn load_replaces_wholesale() {
        let service = InMemoryService::seeded(vec![area("a1", "Payroll"), area("a2", "Billing")]);
        let mut cache = EntityCache::new();
        cache.apply_create(area("a-old", "Stale")).unwrap();

        let count = cache.load(&service).await.unwrap();
        assert_eq!(count, 2);
        assert!(!cache.contains("a-old"));
        assert!(cache.contains("a1"));
    }

    #[tokio::test]
    async fn failed_load_leaves_list_unmodified() {
        struct FailingService;

        #[async_trait]
        impl EntityService<Area> for FailingService {
            async fn list(&self) -> Result<Vec<Area>, ServiceError> {
                Err(ServiceError::Timeout)
            }
            async fn create(&self, _: Area) -> Result<Area, ServiceError> {
                unreachable!()
            }
            async fn update(&self, _: &str, _: Area) -> Result<Area, ServiceError> {
                unreachable!()
            }
            async fn delete(&self, _: &str) -> Result<(), ServiceError> {
                unreachable!()
            }
        }

        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();

        let result = cache.load(&FailingService).await;
        assert!(matches!(
            result,
            Err(StoreError::Service(ServiceError::Timeout))
        ));
        // Prior list survives the failure.
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("a1"));
    }

    #[test]
    fn replace_all_rejects_duplicate_ids() {
        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();

        let result = cache.replace_all(vec![area("a2", "Billing"), area("a2", "Billing again")]);
        assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
        // Nothing was published.
        assert!(cache.contains("a1"));
    }

    #[test]
    fn apply_create_rejects_known_id() {
        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();
        let result = cache.apply_create(area("a1", "Payroll copy"));
        assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn apply_update_absent_id_is_noop() {
        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();

        // Concurrent delete elsewhere could have removed the record.
        assert!(!cache.apply_update(area("a-gone", "Ghost")));
        assert_eq!(cache.len(), 1);

        assert!(cache.apply_update(area("a1", "Payroll v2")));
        assert_eq!(cache.get("a1").map(|a| a.name.as_str()), Some("Payroll v2"));
    }

    #[test]
    fn apply_delete_is_idempotent() {
        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();

        assert!(cache.apply_delete("a1"));
        let after_first = cache.records().to_vec();

        assert!(!cache.apply_delete("a1"));
        assert_eq!(cache.records(), &after_first[..]);
        assert!(cache.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut cache = EntityCache::new();
        cache.apply_create(area("a1", "Payroll")).unwrap();
        cache.apply_create(area("a2", "Billing")).unwrap();

        assert_eq!(cache.search("PAY").len(), 1);
        assert_eq!(cache.search("").len(), 2);
        assert_eq!(cache.search("nothing").len(), 0);
        // Department matches too.
        assert_eq!(cache.search("finance").len(), 2);
    }
}
