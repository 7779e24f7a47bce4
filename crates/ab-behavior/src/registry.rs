//! `DefinitionRegistry` — the single source of truth for behavior definitions.
//!
//! # Layers
//!
//! - **core**: registered once at load, never removed.
//! - **overlay**: data-driven definitions, replaceable per id and clearable
//!   as a whole.  An overlay may never shadow a core id, so at most one layer
//!   answers for any id.
//!
//! # Snapshots
//!
//! Definitions are handed out as `Arc<BehaviorDefinition>`.  Running
//! instances keep the `Arc` they were created from, so replacing or clearing
//! the overlay never changes a behavior mid-run.  [`all`][DefinitionRegistry::all]
//! returns an owned, id-sorted snapshot that diagnostic readers may hold
//! across ticks.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::info;

use ab_core::DefinitionId;

use crate::{BehaviorDefinition, RegistryError, RegistryResult};

#[derive(Default)]
pub struct DefinitionRegistry {
    core:    FxHashMap<DefinitionId, Arc<BehaviorDefinition>>,
    overlay: FxHashMap<DefinitionId, Arc<BehaviorDefinition>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a core definition.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateDefinition`] if the id exists in either layer.
    pub fn register(
        &mut self,
        definition: BehaviorDefinition,
    ) -> RegistryResult<Arc<BehaviorDefinition>> {
        let id = definition.id.clone();
        if self.contains(id.as_str()) {
            return Err(RegistryError::DuplicateDefinition(id));
        }
        let definition = Arc::new(definition);
        self.core.insert(id, Arc::clone(&definition));
        Ok(definition)
    }

    /// Add or replace an overlay definition.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ProtectedDefinition`] if the id belongs to the core layer.
    pub fn register_overlay(
        &mut self,
        definition: BehaviorDefinition,
    ) -> RegistryResult<Arc<BehaviorDefinition>> {
        let id = definition.id.clone();
        if self.core.contains_key(&id) {
            return Err(RegistryError::ProtectedDefinition(id));
        }
        let definition = Arc::new(definition);
        if self.overlay.insert(id.clone(), Arc::clone(&definition)).is_some() {
            info!(definition = %id, "overlay definition replaced");
        }
        Ok(definition)
    }

    /// Drop every overlay definition.  Core definitions are untouched.
    /// Returns how many were removed.
    pub fn clear_overlay(&mut self) -> usize {
        let removed = self.overlay.len();
        self.overlay.clear();
        if removed > 0 {
            info!(removed, "overlay cleared");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<Arc<BehaviorDefinition>> {
        self.overlay.get(id).or_else(|| self.core.get(id)).cloned()
    }

    /// Like [`get`][Self::get], but absence is an error.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownDefinition`] if neither layer holds `id`.
    pub fn require(&self, id: &str) -> RegistryResult<Arc<BehaviorDefinition>> {
        self.get(id)
            .ok_or_else(|| RegistryError::UnknownDefinition(DefinitionId::new(id)))
    }

    /// Snapshot of every definition, sorted by id.
    pub fn all(&self) -> Vec<Arc<BehaviorDefinition>> {
        let mut defs: Vec<_> = self.core.values().chain(self.overlay.values()).cloned().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    pub fn contains(&self, id: &str) -> bool {
        self.core.contains_key(id) || self.overlay.contains_key(id)
    }

    pub fn is_overlay(&self, id: &str) -> bool {
        self.overlay.contains_key(id)
    }

    /// Total definitions across both layers.
    pub fn len(&self) -> usize {
        self.core.len() + self.overlay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }

    /// Core ids, sorted.
    pub fn core_ids(&self) -> Vec<DefinitionId> {
        sorted_ids(&self.core)
    }

    /// Overlay ids, sorted.
    pub fn overlay_ids(&self) -> Vec<DefinitionId> {
        sorted_ids(&self.overlay)
    }
}

fn sorted_ids(layer: &FxHashMap<DefinitionId, Arc<BehaviorDefinition>>) -> Vec<DefinitionId> {
    let mut ids: Vec<_> = layer.keys().cloned().collect();
    ids.sort();
    ids
}
