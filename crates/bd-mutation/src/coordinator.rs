// coordinator.rs — the transactional envelope around every mutation.
//
// Every create/update/delete across all four entity kinds runs through
// here, in strict phase order:
//
//   begin (claim the in-flight slot) → Validating → Authorizing
//     → Submitting (the only suspension point) → Reconciling → settle
//
// Failure at any phase settles straight back to Idle with no store
// mutation. The store is reconciled by patching with the record the
// collaborator *returned* — never with the submitted form data — the
// same single strategy for every entity kind, so reload-vs-patch
// ordering bugs cannot appear.
//
// The coordinator takes `&self` everywhere: overlapping UI calls are
// exactly the races it exists to arbitrate, and the store lock is never
// held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bd_authz::{AuthzDecision, AuthzGuard, MutationOp, PrincipalSource};
use bd_entity::{Area, Company, Entity, EntityKind, Principal, Task, TaskDraft, User};
use bd_store::{EntityCache, EntityService, EntityStore};

use crate::error::MutationError;
use crate::flight::{Flight, FlightTable, MutationPhase};
use crate::validate::validate_task;
use crate::workflow::{Notification, NotificationBoard};

/// The four persistence collaborators, one per entity kind.
pub struct Backends {
    pub users: Arc<dyn EntityService<User>>,
    pub companies: Arc<dyn EntityService<Company>>,
    pub areas: Arc<dyn EntityService<Area>>,
    pub tasks: Arc<dyn EntityService<Task>>,
}

/// The mutation coordinator: owns the entity store, the in-flight
/// table, and the notification board; consults the authorization guard
/// and the task relation validator before anything leaves the client.
pub struct Coordinator {
    guard: AuthzGuard,
    principals: Arc<dyn PrincipalSource>,
    backends: Backends,
    store: Mutex<EntityStore>,
    flights: FlightTable,
    board: NotificationBoard,
}

impl Coordinator {
    pub fn new(backends: Backends, principals: Arc<dyn PrincipalSource>) -> Self {
        Self {
            guard: AuthzGuard::new(),
            principals,
            backends,
            store: Mutex::new(EntityStore::new()),
            flights: FlightTable::new(),
            board: NotificationBoard::new(),
        }
    }

    /// Read access to the store for dependent components (form selects,
    /// list rendering, reference checks). Writes stay in here.
    pub fn with_store<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        f(&self.lock_store())
    }

    /// The queryable in-flight table (e.g. to disable a Save button).
    pub fn flights(&self) -> &FlightTable {
        &self.flights
    }

    /// The single-slot notification board.
    pub fn notifications(&self) -> &NotificationBoard {
        &self.board
    }

    // ── loads ──

    /// Refresh one kind's list wholesale from its collaborator. On
    /// failure the cached list is left unmodified. Returns the new
    /// list length.
    pub async fn load(&self, kind: EntityKind) -> Result<usize, MutationError> {
        let count = match kind {
            EntityKind::User => {
                let records = self.backends.users.list().await;
                self.publish_snapshot(records, EntityStore::users_mut)?
            }
            EntityKind::Company => {
                let records = self.backends.companies.list().await;
                self.publish_snapshot(records, EntityStore::companies_mut)?
            }
            EntityKind::Area => {
                let records = self.backends.areas.list().await;
                self.publish_snapshot(records, EntityStore::areas_mut)?
            }
            EntityKind::Task => {
                let records = self.backends.tasks.list().await;
                self.publish_snapshot(records, EntityStore::tasks_mut)?
            }
        };
        tracing::info!(%kind, count, "list loaded");
        Ok(count)
    }

    /// Refresh all four lists, the way a surface does on mount. Stops
    /// at the first failure.
    pub async fn load_all(&self) -> Result<(), MutationError> {
        for kind in [
            EntityKind::User,
            EntityKind::Company,
            EntityKind::Area,
            EntityKind::Task,
        ] {
            self.load(kind).await?;
        }
        Ok(())
    }

    fn publish_snapshot<T: Entity>(
        &self,
        fetched: Result<Vec<T>, bd_store::ServiceError>,
        select: fn(&mut EntityStore) -> &mut EntityCache<T>,
    ) -> Result<usize, MutationError> {
        let records = fetched.map_err(MutationError::from_service)?;
        let mut store = self.lock_store();
        Ok(select(&mut store).replace_all(records)?)
    }

    // ── task mutations ──

    /// Submit the task form: create when the draft carries no id,
    /// full-record update when it does.
    pub async fn submit_task(&self, draft: TaskDraft) -> Result<Task, MutationError> {
        let op = if draft.is_edit() {
            MutationOp::Update
        } else {
            MutationOp::Create
        };
        let flight = self.flights.begin(EntityKind::Task, op)?;
        let result = self.submit_task_inner(&flight, op, draft).await;
        self.report(EntityKind::Task, op, &result);
        result
    }

    async fn submit_task_inner(
        &self,
        flight: &Flight,
        op: MutationOp,
        draft: TaskDraft,
    ) -> Result<Task, MutationError> {
        // Validating — against the snapshot as it is right now.
        let payload = {
            let store = self.lock_store();
            validate_task(&draft, &store)?
        };

        flight.advance(MutationPhase::Authorizing);
        self.authorize(EntityKind::Task, op)?;

        flight.advance(MutationPhase::Submitting);
        let persisted = match op {
            MutationOp::Create => self.backends.tasks.create(payload).await,
            _ => {
                let id = payload.id.clone();
                self.backends.tasks.update(&id, payload).await
            }
        }
        .map_err(MutationError::from_service)?;

        flight.advance(MutationPhase::Reconciling);
        let mut store = self.lock_store();
        match op {
            MutationOp::Create => store.tasks_mut().apply_create(persisted.clone())?,
            _ => {
                // Absent id means a concurrent delete won; last write
                // to the server stands either way.
                store.tasks_mut().apply_update(persisted.clone());
            }
        }
        Ok(persisted)
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), MutationError> {
        self.delete_record(&*self.backends.tasks, EntityStore::tasks_mut, id)
            .await
    }

    // ── directory mutations (admin-gated) ──

    /// Save a user record: create when the id is empty, update otherwise.
    pub async fn save_user(&self, payload: User) -> Result<User, MutationError> {
        self.save_record(&*self.backends.users, EntityStore::users_mut, payload)
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), MutationError> {
        self.delete_record(&*self.backends.users, EntityStore::users_mut, id)
            .await
    }

    pub async fn save_company(&self, payload: Company) -> Result<Company, MutationError> {
        self.save_record(
            &*self.backends.companies,
            EntityStore::companies_mut,
            payload,
        )
        .await
    }

    pub async fn delete_company(&self, id: &str) -> Result<(), MutationError> {
        self.delete_record(&*self.backends.companies, EntityStore::companies_mut, id)
            .await
    }

    pub async fn save_area(&self, payload: Area) -> Result<Area, MutationError> {
        self.save_record(&*self.backends.areas, EntityStore::areas_mut, payload)
            .await
    }

    pub async fn delete_area(&self, id: &str) -> Result<(), MutationError> {
        self.delete_record(&*self.backends.areas, EntityStore::areas_mut, id)
            .await
    }

    /// Kind-dispatched delete, used by the confirmation workflow.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), MutationError> {
        match kind {
            EntityKind::User => self.delete_user(id).await,
            EntityKind::Company => self.delete_company(id).await,
            EntityKind::Area => self.delete_area(id).await,
            EntityKind::Task => self.delete_task(id).await,
        }
    }

    // ── the shared mutation engine ──

    async fn save_record<T: Entity>(
        &self,
        service: &dyn EntityService<T>,
        select: fn(&mut EntityStore) -> &mut EntityCache<T>,
        payload: T,
    ) -> Result<T, MutationError> {
        let op = if payload.id().is_empty() {
            MutationOp::Create
        } else {
            MutationOp::Update
        };
        let flight = self.flights.begin(T::KIND, op)?;
        let result = self
            .save_record_inner(&flight, service, select, op, payload)
            .await;
        self.report(T::KIND, op, &result);
        result
    }

    async fn save_record_inner<T: Entity>(
        &self,
        flight: &Flight,
        service: &dyn EntityService<T>,
        select: fn(&mut EntityStore) -> &mut EntityCache<T>,
        op: MutationOp,
        payload: T,
    ) -> Result<T, MutationError> {
        // Validating — directory records carry no cross-references;
        // field-level checks live in their forms.

        flight.advance(MutationPhase::Authorizing);
        self.authorize(T::KIND, op)?;

        flight.advance(MutationPhase::Submitting);
        let persisted = match op {
            MutationOp::Create => service.create(payload).await,
            _ => {
                let id = payload.id().to_string();
                service.update(&id, payload).await
            }
        }
        .map_err(MutationError::from_service)?;

        flight.advance(MutationPhase::Reconciling);
        let mut store = self.lock_store();
        match op {
            MutationOp::Create => select(&mut store).apply_create(persisted.clone())?,
            _ => {
                select(&mut store).apply_update(persisted.clone());
            }
        }
        Ok(persisted)
    }

    async fn delete_record<T: Entity>(
        &self,
        service: &dyn EntityService<T>,
        select: fn(&mut EntityStore) -> &mut EntityCache<T>,
        id: &str,
    ) -> Result<(), MutationError> {
        let flight = self.flights.begin(T::KIND, MutationOp::Delete)?;
        let result = self
            .delete_record_inner(&flight, service, select, id)
            .await;
        self.report(T::KIND, MutationOp::Delete, &result);
        result
    }

    async fn delete_record_inner<T: Entity>(
        &self,
        flight: &Flight,
        service: &dyn EntityService<T>,
        select: fn(&mut EntityStore) -> &mut EntityCache<T>,
        id: &str,
    ) -> Result<(), MutationError> {
        if id.trim().is_empty() {
            return Err(MutationError::Validation(
                "missing identifier for delete".to_string(),
            ));
        }

        flight.advance(MutationPhase::Authorizing);
        self.authorize(T::KIND, MutationOp::Delete)?;

        flight.advance(MutationPhase::Submitting);
        service
            .delete(id)
            .await
            .map_err(MutationError::from_service)?;

        flight.advance(MutationPhase::Reconciling);
        let mut store = self.lock_store();
        select(&mut store).apply_delete(id);
        Ok(())
    }

    /// Read the principal *now* and ask the guard. Checked before any
    /// external call, never after.
    fn authorize(&self, kind: EntityKind, op: MutationOp) -> Result<Principal, MutationError> {
        let principal = self.principals.current().ok_or_else(|| {
            MutationError::PermissionDenied("no authenticated session".to_string())
        })?;
        match self.guard.authorize(&principal, kind, op) {
            AuthzDecision::Allow => Ok(principal),
            AuthzDecision::Deny { reason } => Err(MutationError::PermissionDenied(reason)),
        }
    }

    /// Publish the settled outcome. A rejected concurrent attempt stays
    /// silent — the action is a no-op, not a user-facing error.
    fn report<R>(&self, kind: EntityKind, op: MutationOp, result: &Result<R, MutationError>) {
        match result {
            Ok(_) => {
                tracing::info!(%kind, %op, "mutation succeeded");
                self.board
                    .publish(Notification::success(format!("{} {}", kind, past_tense(op))));
            }
            Err(MutationError::ConcurrentOperation { .. }) => {}
            Err(err) => {
                tracing::warn!(%kind, %op, error = %err, "mutation failed");
                self.board.publish(Notification::error(err.to_string()));
            }
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, EntityStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn past_tense(op: MutationOp) -> &'static str {
    match op {
        MutationOp::Create => "created",
        MutationOp::Update => "updated",
        MutationOp::Delete => "deleted",
    }
}
