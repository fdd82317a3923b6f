//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::store::{Middleware, Reduce, Store, StoreConfig};
use std::sync::Arc;

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder<T> {
    reducer: Option<Box<dyn Reduce<T>>>,
    middleware: Vec<Arc<dyn Middleware<T>>>,
    config: StoreConfig,
}

impl<T: 'static> StoreBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            reducer: None,
            middleware: Vec::new(),
            config: StoreConfig::default(),
        }
    }

    /// Set the reducer (required).
    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reduce<T> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Append a middleware. Earlier middleware sees messages first.
    pub fn middleware<M>(self, middleware: M) -> Self
    where
        M: Middleware<T> + 'static,
    {
        self.shared_middleware(Arc::new(middleware))
    }

    /// Append a middleware the caller keeps a handle to.
    pub fn shared_middleware(mut self, middleware: Arc<dyn Middleware<T>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the nested dispatch limit.
    pub fn max_dispatch_depth(mut self, depth: usize) -> Self {
        self.config.max_dispatch_depth = depth;
        self
    }

    /// Keep the last `capacity` reduced messages in the dispatch log.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Build the store, running the reducer once to produce the initial state.
    pub fn build(self) -> Result<Store<T>, BuildError> {
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;

        if self.config.max_dispatch_depth == 0 {
            return Err(BuildError::ZeroDispatchDepth);
        }

        Store::init(reducer, self.middleware, self.config).map_err(BuildError::Init)
    }
}

impl<T: 'static> Default for StoreBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
