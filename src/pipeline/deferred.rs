//! Deferred execution pipeline backed by Stillwater effects.
//!
//! The middleware half only queues matching effect carriers; nothing runs
//! inside a dispatch. Work happens when the owner calls
//! [`DeferredRunner::drain`], which runs each queued job's effect against an
//! environment and dispatches the messages it produces back into the store.
//! Suspension points are whatever the handler's effect awaits.

use crate::core::{Matcher, Message, Record};
use crate::store::{DispatchError, Dispatcher, Middleware, Store};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stillwater::effect::BoxedEffect;
use stillwater::effect::Effect as _;

/// Factory producing a fresh effect for each queued record.
pub type DeferredHandler<Env> =
    Arc<dyn Fn(&Record) -> BoxedEffect<Vec<Message>, DispatchError, Env> + Send + Sync>;

struct Job<Env> {
    record: Record,
    handler: DeferredHandler<Env>,
}

/// Queues matching messages during dispatch and interprets them later.
///
/// Share it with the store through an `Arc` so the caller can drain it:
///
/// ```
/// use effect_relay::builder::relay;
/// use effect_relay::core::{Message, ModelError, ModelInput, ModelOutput, Record};
/// use effect_relay::pipeline::DeferredRunner;
/// use std::sync::Arc;
/// use stillwater::prelude::*;
///
/// fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
///     let state = input.state.copied().unwrap_or(0);
///     Ok(match input.action.kind() {
///         "SAVE" => ModelOutput::new(state).with_effect(Record::new("SAVE")),
///         "SAVED" => ModelOutput::new(state + 1),
///         _ => ModelOutput::new(state),
///     })
/// }
///
/// # tokio_test_block_on(async {
/// let runner = Arc::new(DeferredRunner::<()>::new().on_effect("SAVE", |_record| {
///     pure(vec![Message::action(Record::new("SAVED"))]).boxed()
/// }));
/// let mut store = relay(model).shared_middleware(runner.clone()).build().unwrap();
///
/// store.dispatch(Record::new("SAVE")).unwrap();
/// assert_eq!(runner.pending(), 1);
///
/// runner.drain(&mut store, &()).await.unwrap();
/// assert_eq!(store.state().state, Some(1));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct DeferredRunner<Env> {
    rules: Vec<(Matcher, DeferredHandler<Env>)>,
    queue: Mutex<VecDeque<Job<Env>>>,
}

impl<Env: Clone + Send + Sync + 'static> DeferredRunner<Env> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a job for every message `matcher` accepts.
    pub fn on<F>(mut self, matcher: Matcher, handler: F) -> Self
    where
        F: Fn(&Record) -> BoxedEffect<Vec<Message>, DispatchError, Env> + Send + Sync + 'static,
    {
        self.rules.push((matcher, Arc::new(handler)));
        self
    }

    /// Queue a job for every effect carrier of type `kind`.
    pub fn on_effect<F>(self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Record) -> BoxedEffect<Vec<Message>, DispatchError, Env> + Send + Sync + 'static,
    {
        self.on(Matcher::effect(kind), handler)
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    /// Run queued jobs in FIFO order until the queue is empty, dispatching
    /// every produced message into `store`. Jobs queued by those dispatches
    /// run in the same drain.
    ///
    /// Returns the number of jobs run. On error the failing job is dropped
    /// and the rest stay queued.
    pub async fn drain<T>(&self, store: &mut Store<T>, env: &Env) -> Result<usize, DispatchError> {
        let mut processed = 0;

        while let Some(job) = self.pop() {
            tracing::debug!(effect = job.record.kind(), "running deferred effect");
            let messages = (job.handler)(&job.record).run(env).await?;
            for message in messages {
                store.dispatch(message)?;
            }
            processed += 1;
        }

        Ok(processed)
    }

    fn pop(&self) -> Option<Job<Env>> {
        self.queue().pop_front()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Job<Env>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<Env: Clone + Send + Sync + 'static> Default for DeferredRunner<Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Env> fmt::Debug for DeferredRunner<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredRunner")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl<T, Env: Clone + Send + Sync + 'static> Middleware<T> for DeferredRunner<Env> {
    fn handle(
        &self,
        api: &mut Dispatcher<'_, T>,
        message: Message,
    ) -> Result<Message, DispatchError> {
        let message = api.next(message)?;

        for (matcher, handler) in &self.rules {
            if matcher.check(&message) {
                self.queue().push_back(Job {
                    record: message.record().clone(),
                    handler: Arc::clone(handler),
                });
            }
        }

        Ok(message)
    }
}
