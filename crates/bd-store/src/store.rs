// store.rs — EntityStore: the four entity caches under one roof.
//
// The task form needs the current User/Company/Area lists to populate
// its selects and to validate references, so the four caches travel
// together. Writes go through the mutation coordinator's reconcile step
// and through load — dependent components get read access only.

use bd_entity::{Area, Company, Task, User};

use crate::cache::EntityCache;

/// The aggregate client-side store: one cache per entity kind.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    users: EntityCache<User>,
    companies: EntityCache<Company>,
    areas: EntityCache<Area>,
    tasks: EntityCache<Task>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &EntityCache<User> {
        &self.users
    }

    pub fn companies(&self) -> &EntityCache<Company> {
        &self.companies
    }

    pub fn areas(&self) -> &EntityCache<Area> {
        &self.areas
    }

    pub fn tasks(&self) -> &EntityCache<Task> {
        &self.tasks
    }

    pub fn users_mut(&mut self) -> &mut EntityCache<User> {
        &mut self.users
    }

    pub fn companies_mut(&mut self) -> &mut EntityCache<Company> {
        &mut self.companies
    }

    pub fn areas_mut(&mut self) -> &mut EntityCache<Area> {
        &mut self.areas
    }

    pub fn tasks_mut(&mut self) -> &mut EntityCache<Task> {
        &mut self.tasks
    }
}
