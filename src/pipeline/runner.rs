//! Synchronous execution pipeline: rules that interpret effect carriers.

use crate::core::{Matcher, Message, Record, DISPATCH};
use crate::store::{DispatchError, Dispatcher, Middleware};
use std::fmt;

/// Handler run when a rule's matcher accepts a message.
///
/// Receives the message's record and the store; usually dispatches one or more
/// ordinary actions describing the outcome of the work it performed.
pub type EffectHandler<T> =
    Box<dyn Fn(&Record, &mut Dispatcher<'_, T>) -> Result<(), DispatchError>>;

/// A matcher paired with the handler it triggers.
pub struct Rule<T> {
    matcher: Matcher,
    handler: EffectHandler<T>,
}

impl<T> Rule<T> {
    /// Pair `matcher` with the handler it triggers.
    pub fn new<F>(matcher: Matcher, handler: F) -> Self
    where
        F: Fn(&Record, &mut Dispatcher<'_, T>) -> Result<(), DispatchError> + 'static,
    {
        Self {
            matcher,
            handler: Box::new(handler),
        }
    }

    /// True if this rule should run for `message`.
    pub fn matches(&self, message: &Message) -> bool {
        self.matcher.check(message)
    }
}

/// The built-in `DISPATCH` rule: replay the carried `action` as an ordinary
/// message.
pub fn dispatch_rule<T: 'static>() -> Rule<T> {
    Rule::new(Matcher::effect(DISPATCH), replay_action)
}

fn replay_action<T>(effect: &Record, api: &mut Dispatcher<'_, T>) -> Result<(), DispatchError> {
    let action = effect
        .field("action")
        .ok_or_else(|| DispatchError::MalformedDispatch("missing `action`".to_string()))?;
    let action: Record = serde_json::from_value(action.clone())
        .map_err(|e| DispatchError::MalformedDispatch(e.to_string()))?;

    tracing::debug!(action = action.kind(), "replaying DISPATCH effect");
    api.dispatch_action(action)?;
    Ok(())
}

/// Middleware that runs rules against every message after it is reduced.
///
/// Rules run in registration order; every matching rule runs. Handler errors
/// abort the dispatch and propagate.
///
/// # Example
///
/// ```
/// use effect_relay::builder::relay;
/// use effect_relay::core::{ModelError, ModelInput, ModelOutput, Record};
/// use effect_relay::pipeline::EffectRunner;
///
/// fn model(input: ModelInput<'_, i64>) -> Result<ModelOutput<i64>, ModelError> {
///     let state = input.state.copied().unwrap_or(0);
///     Ok(match input.action.kind() {
///         "INCREMENT" => ModelOutput::new(state).with_effect(Record::new("INCREMENT")),
///         "ACTUALLY_INCREMENT" => ModelOutput::new(state + 1),
///         _ => ModelOutput::new(state),
///     })
/// }
///
/// let runner = EffectRunner::new().on_effect("INCREMENT", |_effect, api| {
///     api.dispatch_action(Record::new("ACTUALLY_INCREMENT"))?;
///     Ok(())
/// });
/// let mut store = relay(model).middleware(runner).build().unwrap();
///
/// store.dispatch(Record::new("INCREMENT")).unwrap();
/// assert_eq!(store.state().state, Some(1));
/// ```
pub struct EffectRunner<T> {
    rules: Vec<Rule<T>>,
}

impl<T> EffectRunner<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a prebuilt rule.
    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run `handler` for every message `matcher` accepts.
    pub fn on<F>(self, matcher: Matcher, handler: F) -> Self
    where
        F: Fn(&Record, &mut Dispatcher<'_, T>) -> Result<(), DispatchError> + 'static,
    {
        self.rule(Rule::new(matcher, handler))
    }

    /// Run `handler` for every effect carrier of type `kind`.
    pub fn on_effect<F>(self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Record, &mut Dispatcher<'_, T>) -> Result<(), DispatchError> + 'static,
    {
        self.on(Matcher::effect(kind), handler)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: 'static> EffectRunner<T> {
    /// Install the built-in `DISPATCH` rule.
    pub fn with_dispatch_rule(self) -> Self {
        self.rule(dispatch_rule())
    }
}

impl<T> Default for EffectRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EffectRunner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRunner")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<T> Middleware<T> for EffectRunner<T> {
    fn handle(
        &self,
        api: &mut Dispatcher<'_, T>,
        message: Message,
    ) -> Result<Message, DispatchError> {
        let message = api.next(message)?;

        for rule in self.rules.iter().filter(|r| r.matches(&message)) {
            tracing::debug!(kind = message.kind(), "effect rule matched");
            (rule.handler)(message.record(), &mut *api)?;
        }

        Ok(message)
    }
}
