//! Reference in-memory host for tests.
//!
//! This is not a persistence engine; it exists so tests can construct
//! isolated context graphs and exercise the facade end to end. Contexts
//! share a store set through `Rc` and keep per-context row caches behind
//! `RefCell`, matching the single-owner execution model of the contract.

mod executor;
pub mod fixtures;

#[cfg(test)]
mod tests;

use crate::{
    context::HostContext,
    error::InternalError,
    metadata::{EntityMetadata, MetadataRegistry},
    request::{FetchOutcome, FetchRequest, Staleness},
    row::Row,
    traits::EntityValue,
    types::{ContextId, Id},
};
use log::trace;
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    rc::Rc,
};
use ulid::Ulid;

///
/// MemoryStore
///
/// Rows of one physical store, keyed by entity path and identity.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: BTreeMap<(&'static str, Ulid), Row>,
}

impl MemoryStore {
    /// Insert or replace a row, returning the previous version.
    pub fn upsert(&mut self, entity: &'static str, row: Row) -> Option<Row> {
        self.rows.insert((entity, row.id), row)
    }

    /// Remove a row by identity.
    pub fn remove(&mut self, entity: &'static str, id: Ulid) -> Option<Row> {
        self.rows.remove(&(entity, id))
    }

    #[must_use]
    pub fn get(&self, entity: &'static str, id: Ulid) -> Option<&Row> {
        self.rows.get(&(entity, id))
    }

    /// Iterate the rows of one entity in identity order.
    pub fn rows_of(&self, entity: &'static str) -> impl Iterator<Item = &Row> {
        self.rows
            .range((entity, Ulid(0))..=(entity, Ulid(u128::MAX)))
            .map(|(_, row)| row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///
/// Shared
///
/// Store set plus context-id allocator shared by one context tree.
///

#[derive(Debug)]
struct Shared {
    stores: RefCell<HashMap<&'static str, MemoryStore>>,
    next_context: Cell<u64>,
}

///
/// MemoryHost
///
/// Owner of the shared store set; hands out root contexts and seeds rows.
///

#[derive(Debug)]
pub struct MemoryHost {
    shared: Rc<Shared>,
}

impl MemoryHost {
    /// Create a host with one empty store per registered store name.
    #[must_use]
    pub fn new(registry: &MetadataRegistry) -> Self {
        let stores = registry
            .stores()
            .map(|name| (name, MemoryStore::default()))
            .collect();

        Self {
            shared: Rc::new(Shared {
                stores: RefCell::new(stores),
                next_context: Cell::new(0),
            }),
        }
    }

    /// Insert or replace an entity row in its assigned store.
    ///
    /// Writes go straight to the store; context caches are deliberately
    /// left alone so staleness is observable until a refresh.
    pub fn upsert<E: EntityValue>(
        &self,
        registry: &MetadataRegistry,
        entity: &E,
    ) -> Result<(), InternalError> {
        let meta = registry.resolve::<E>()?;

        self.with_store_mut(&meta, |store| {
            store.upsert(meta.model.path, entity.to_row());
        })
    }

    /// Remove an entity row from its assigned store.
    pub fn remove<E: EntityValue>(
        &self,
        registry: &MetadataRegistry,
        id: Id<E>,
    ) -> Result<bool, InternalError> {
        let meta = registry.resolve::<E>()?;

        self.with_store_mut(&meta, |store| {
            store.remove(meta.model.path, id.key()).is_some()
        })
    }

    /// Spawn a root execution context over the shared store set.
    #[must_use]
    pub fn root_context(&self) -> Rc<MemoryContext> {
        MemoryContext::spawn(Rc::clone(&self.shared), None)
    }

    fn with_store_mut<R>(
        &self,
        meta: &EntityMetadata,
        f: impl FnOnce(&mut MemoryStore) -> R,
    ) -> Result<R, InternalError> {
        let mut stores = self.shared.stores.borrow_mut();
        let store = stores
            .get_mut(meta.store)
            .ok_or_else(|| InternalError::store_internal(format!("store '{}' is gone", meta.store)))?;

        Ok(f(store))
    }
}

///
/// MemoryContext
///
/// One execution context: a per-context row cache over the shared stores,
/// with an optional parent. Not `Sync`; all access is single-owner.
///

#[derive(Debug)]
pub struct MemoryContext {
    id: ContextId,
    parent: Option<Rc<MemoryContext>>,
    shared: Rc<Shared>,
    cache: RefCell<HashMap<(&'static str, Ulid), Row>>,
    refreshes: Cell<u64>,
}

impl MemoryContext {
    fn spawn(shared: Rc<Shared>, parent: Option<Rc<Self>>) -> Rc<Self> {
        let raw = shared.next_context.get();
        shared.next_context.set(raw + 1);

        Rc::new(Self {
            id: ContextId::new(raw),
            parent,
            shared,
            cache: RefCell::new(HashMap::new()),
            refreshes: Cell::new(0),
        })
    }

    /// Spawn a child context sharing this context's store set.
    #[must_use]
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Self::spawn(Rc::clone(&self.shared), Some(Rc::clone(self)))
    }

    /// Number of refreshes this context has performed. Test observability.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.get()
    }

    /// Number of cached rows. Test observability.
    #[must_use]
    pub fn cached_rows(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Fetch a row for materialization, honoring the cache policy.
    fn materialize(
        &self,
        entity: &'static str,
        staleness: Staleness,
        store_row: &Row,
    ) -> Row {
        let mut cache = self.cache.borrow_mut();
        let key = (entity, store_row.id);

        match staleness {
            Staleness::AllowCached => cache
                .entry(key)
                .or_insert_with(|| store_row.clone())
                .clone(),
            Staleness::RequireFresh => {
                cache.insert(key, store_row.clone());
                store_row.clone()
            }
        }
    }

    fn with_store<R>(
        &self,
        name: &'static str,
        f: impl FnOnce(&MemoryStore) -> R,
    ) -> Result<R, InternalError> {
        let stores = self.shared.stores.borrow();
        let store = stores
            .get(name)
            .ok_or_else(|| InternalError::store_internal(format!("store '{name}' is gone")))?;

        Ok(f(store))
    }
}

impl HostContext for MemoryContext {
    fn context_id(&self) -> ContextId {
        self.id
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    fn execute(&self, request: &FetchRequest) -> Result<FetchOutcome, InternalError> {
        request.validate()?;

        self.with_store(request.store, |store| executor::execute(self, store, request))?
    }

    fn existing_row(
        &self,
        meta: &EntityMetadata,
        id: Ulid,
    ) -> Result<Option<Row>, InternalError> {
        let key = (meta.model.path, id);

        if let Some(row) = self.cache.borrow().get(&key) {
            return Ok(Some(row.clone()));
        }

        self.with_store(meta.store, |store| {
            store.get(meta.model.path, id).map(|row| {
                self.cache.borrow_mut().insert(key, row.clone());
                row.clone()
            })
        })
    }

    fn refresh_all_objects(&self) {
        self.cache.borrow_mut().clear();
        self.refreshes.set(self.refreshes.get() + 1);
    }

    fn enqueue_refresh(&self) {
        trace!("context {}: refresh scheduled on own queue", self.id);
        self.refresh_all_objects();
    }
}
