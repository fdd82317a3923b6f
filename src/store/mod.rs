//! In-process state container with a middleware pipeline.
//!
//! The store owns a single state value and replaces it on every reduced
//! message. Messages pass through the installed middleware, in installation
//! order, before reaching the reducer. Middleware can forward a message with
//! [`Dispatcher::next`] and start a fresh dispatch from the top of the chain
//! with [`Dispatcher::dispatch`].
//!
//! Everything runs synchronously on the caller's thread, so the state read
//! right after `next` returns always reflects that message's reduction.

mod config;
mod error;

pub use config::{StoreConfig, DEFAULT_MAX_DISPATCH_DEPTH};
pub use error::DispatchError;

use crate::builder::StoreBuilder;
use crate::core::{
    DispatchEntry, DispatchLog, Message, Model, ModelError, Record, Reducer, StateEnvelope,
};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A reducer as the store sees it: previous state (absent on initialization)
/// and a message in, next state out.
pub trait Reduce<T> {
    fn reduce(&self, state: Option<&T>, message: &Message) -> Result<T, ModelError>;
}

impl<T, F> Reduce<T> for F
where
    F: Fn(Option<&T>, &Message) -> Result<T, ModelError>,
{
    fn reduce(&self, state: Option<&T>, message: &Message) -> Result<T, ModelError> {
        self(state, message)
    }
}

impl<S, M> Reduce<StateEnvelope<S>> for Reducer<S, M>
where
    S: Clone,
    M: Model<S>,
{
    fn reduce(
        &self,
        state: Option<&StateEnvelope<S>>,
        message: &Message,
    ) -> Result<StateEnvelope<S>, ModelError> {
        Reducer::reduce(self, state, message)
    }
}

/// A stage in the store's message pipeline.
///
/// `handle` receives each message and decides what to do with it, usually
/// forwarding it with [`Dispatcher::next`] and returning what that returned.
pub trait Middleware<T> {
    fn handle(&self, api: &mut Dispatcher<'_, T>, message: Message)
        -> Result<Message, DispatchError>;
}

impl<T, F> Middleware<T> for F
where
    F: Fn(&mut Dispatcher<'_, T>, Message) -> Result<Message, DispatchError>,
{
    fn handle(
        &self,
        api: &mut Dispatcher<'_, T>,
        message: Message,
    ) -> Result<Message, DispatchError> {
        self(api, message)
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Listener<T> = Box<dyn FnMut(&T)>;

/// Single-owner state container.
pub struct Store<T> {
    state: T,
    reducer: Box<dyn Reduce<T>>,
    middleware: Vec<Arc<dyn Middleware<T>>>,
    subscribers: Vec<(SubscriptionId, Listener<T>)>,
    log: DispatchLog,
    config: StoreConfig,
    depth: usize,
}

impl<T: 'static> Store<T> {
    /// Start building a store.
    pub fn builder() -> StoreBuilder<T> {
        StoreBuilder::new()
    }

    /// Create a store, running the reducer once with no prior state and the
    /// init message. Middleware does not see the init message.
    pub(crate) fn init(
        reducer: Box<dyn Reduce<T>>,
        middleware: Vec<Arc<dyn Middleware<T>>>,
        config: StoreConfig,
    ) -> Result<Self, DispatchError> {
        let state = reducer.reduce(None, &Message::init())?;
        tracing::debug!(
            middleware = middleware.len(),
            max_dispatch_depth = config.max_dispatch_depth,
            "store initialized"
        );

        Ok(Self {
            state,
            reducer,
            middleware,
            subscribers: Vec::new(),
            log: DispatchLog::with_capacity(config.history_capacity),
            config,
            depth: 0,
        })
    }
}

impl<T> Store<T> {
    /// Current state.
    pub fn state(&self) -> &T {
        &self.state
    }

    /// Dispatch a message through the middleware chain and the reducer.
    ///
    /// Returns the message that reached the end of the chain. On error the
    /// state keeps whatever value the last successful reduction left.
    pub fn dispatch(&mut self, message: impl Into<Message>) -> Result<Message, DispatchError> {
        let message = message.into();
        if self.depth >= self.config.max_dispatch_depth {
            tracing::warn!(
                limit = self.config.max_dispatch_depth,
                kind = message.kind(),
                "dispatch depth limit exceeded"
            );
            return Err(DispatchError::DepthExceeded {
                limit: self.config.max_dispatch_depth,
                kind: message.kind().to_string(),
            });
        }

        self.depth += 1;
        let result = self.forward(0, message);
        self.depth -= 1;
        result
    }

    /// Register a listener called with the new state after every reduction.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Log of reduced messages; empty unless `history_capacity` is set.
    pub fn history(&self) -> &DispatchLog {
        &self.log
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current dispatch nesting; 0 when idle.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn forward(&mut self, index: usize, message: Message) -> Result<Message, DispatchError> {
        match self.middleware.get(index).cloned() {
            Some(middleware) => {
                let mut api = Dispatcher { store: self, index };
                middleware.handle(&mut api, message)
            }
            None => self.apply(message),
        }
    }

    fn apply(&mut self, message: Message) -> Result<Message, DispatchError> {
        let next = self.reducer.reduce(Some(&self.state), &message)?;
        self.state = next;

        if self.log.is_enabled() {
            self.log.push(DispatchEntry::new(message.clone(), self.depth));
        }
        for (_, listener) in &mut self.subscribers {
            listener(&self.state);
        }
        Ok(message)
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("middleware", &self.middleware.len())
            .field("subscribers", &self.subscribers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The store as seen from inside a middleware.
pub struct Dispatcher<'a, T> {
    store: &'a mut Store<T>,
    index: usize,
}

impl<T> Dispatcher<'_, T> {
    /// Forward `message` to the next stage of the chain.
    pub fn next(&mut self, message: Message) -> Result<Message, DispatchError> {
        self.store.forward(self.index + 1, message)
    }

    /// Dispatch `message` from the top of the chain.
    pub fn dispatch(&mut self, message: impl Into<Message>) -> Result<Message, DispatchError> {
        self.store.dispatch(message)
    }

    /// Dispatch `record` as an ordinary action from the top of the chain.
    pub fn dispatch_action(&mut self, record: Record) -> Result<Message, DispatchError> {
        self.store.dispatch(Message::Action(record))
    }

    /// Current store state.
    pub fn state(&self) -> &T {
        &self.store.state
    }

    /// Current dispatch nesting.
    pub fn depth(&self) -> usize {
        self.store.depth
    }
}
