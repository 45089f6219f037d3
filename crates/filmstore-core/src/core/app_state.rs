//! Shared application state
//!
//! One `AppState` is built at startup and handed to every request via an
//! `Arc`. The store is injected behind a generic parameter so tests can
//! run the full stack over a fresh in-memory store.

use std::sync::Arc;

use crate::core::config::Config;
use crate::links::LinkEngine;
use crate::store::StoreImpl;

/// Central application state holding the store handle and link engine.
pub struct AppState<S: StoreImpl> {
    /// Injected document store
    pub store: Arc<S>,

    /// Referential integrity engine over the same store
    pub links: LinkEngine<S>,

    /// Application configuration
    pub config: Config,
}

impl<S: StoreImpl> AppState<S> {
    /// Build state over an existing store handle.
    pub fn new(store: Arc<S>, config: Config) -> Self {
        let links = LinkEngine::new(store.clone());
        Self { store, links, config }
    }
}

// Manual Clone implementation that doesn't require S: Clone; the store
// is behind an Arc, so cloning only bumps reference counts.
impl<S: StoreImpl> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            links: self.links.clone(),
            config: self.config.clone(),
        }
    }
}
