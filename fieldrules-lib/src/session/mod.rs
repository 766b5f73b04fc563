//! Validation sessions
//!
//! A [`Session`] is created per form. It loads the form's rule set once,
//! optionally runs a host continuation after the rules arrive, and then
//! evaluates fields synchronously for as long as the form lives.
//!
//! ```text
//! Created ──> Loading ──> Ready
//!                │
//!                └──────> Failed
//! ```

mod evaluator;
mod store;

pub use evaluator::FieldEvaluator;
pub use store::ErrorMessages;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;
use log::debug;
use log::info;
use log::warn;

use crate::binding::FieldBinding;
use crate::error::BoxError;
use crate::error::Error;
use crate::error::StateError;
use crate::messages::MessageCatalog;
use crate::model::FieldError;
use crate::model::FieldValues;
use crate::model::RuleSet;
use crate::model::ValidationResult;
use crate::model::Verdict;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The load has not started yet.
    Created,
    /// The rule set is being fetched, or the run-after continuation is running.
    Loading,
    /// Fields can be validated. Terminal.
    Ready,
    /// The rule set or the continuation failed. Terminal.
    Failed,
}

impl SessionStatus {
    /// Returns `true` once the session has reached `Ready` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

type RunAfterFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>;

type ReadyFuture = Shared<BoxFuture<'static, Result<(), Error>>>;

enum RunAfterSlot {
    Open(Option<RunAfterFn>),
    Consumed,
}

enum SessionState {
    Created,
    Loading,
    /// Rules are stored; the run-after continuation has not finished.
    Loaded,
    Ready(Arc<RuleSet>),
    Failed,
}

impl SessionState {
    fn status(&self) -> SessionStatus {
        match self {
            Self::Created => SessionStatus::Created,
            Self::Loading | Self::Loaded => SessionStatus::Loading,
            Self::Ready(_) => SessionStatus::Ready,
            Self::Failed => SessionStatus::Failed,
        }
    }
}

struct SessionCore {
    rule_set_name: String,
    messages: Arc<MessageCatalog>,
    state: RwLock<SessionState>,
    loaded: RwLock<Option<Arc<RuleSet>>>,
    run_after: Mutex<RunAfterSlot>,
    errors: ErrorMessages,
}

impl SessionCore {
    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn status(&self) -> SessionStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }

    fn take_run_after(&self) -> Option<RunAfterFn> {
        let mut slot = self.run_after.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *slot, RunAfterSlot::Consumed) {
            RunAfterSlot::Open(run_after) => run_after,
            RunAfterSlot::Consumed => None,
        }
    }

    fn fail(&self, err: Error) -> Error {
        self.take_run_after();
        self.set_state(SessionState::Failed);
        err
    }

    fn ready_rules(&self) -> Result<Arc<RuleSet>, StateError> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Ready(rules) => Ok(Arc::clone(rules)),
            SessionState::Failed => Err(StateError::Failed {
                rule_set: self.rule_set_name.clone(),
            }),
            other => Err(StateError::NotReady {
                rule_set: self.rule_set_name.clone(),
                status: other.status(),
            }),
        }
    }
}

/// Validation state of one form.
///
/// Created by [`ValidationClient::create_session`](crate::ValidationClient::create_session).
/// Cheap to clone; clones share the same state.
///
/// # Example
///
/// ```ignore
/// let session = client.create_session("account")?;
/// session.register_run_after(|| async move {
///     populate_form().await?;
///     Ok(())
/// });
/// session.on_ready().await?;
///
/// let verdict = session.validate_field("email", "a@b.co", &form_values)?;
/// assert!(verdict.is_valid());
/// ```
#[derive(Clone)]
pub struct Session {
    core: Arc<SessionCore>,
    ready: ReadyFuture,
}

impl Session {
    /// Creates a session around a rule set load.
    ///
    /// Nothing runs until [`load`](Self::load) or the first
    /// [`on_ready`](Self::on_ready), so the host can register its run-after
    /// continuation first.
    pub(crate) fn start<F>(rule_set_name: String, messages: Arc<MessageCatalog>, load: F) -> Self
    where
        F: Future<Output = Result<Arc<RuleSet>, Error>> + Send + 'static,
    {
        let core = Arc::new(SessionCore {
            rule_set_name,
            messages,
            state: RwLock::new(SessionState::Created),
            loaded: RwLock::new(None),
            run_after: Mutex::new(RunAfterSlot::Open(None)),
            errors: ErrorMessages::new(),
        });

        let ready = drive(Arc::clone(&core), load).boxed().shared();

        Self { core, ready }
    }

    /// Starts loading in the background without waiting for it.
    ///
    /// Register the run-after continuation before calling this. Calling it
    /// again, or awaiting [`on_ready`](Self::on_ready) later, joins the same
    /// load. Returns `false` if there is no tokio runtime to spawn on; the
    /// load then starts on the first `on_ready`.
    pub fn load(&self) -> bool {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(self.ready.clone());
                true
            }
            Err(_) => false,
        }
    }

    /// Name of the rule set this session validates against.
    pub fn rule_set_name(&self) -> &str {
        &self.core.rule_set_name
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.core.status()
    }

    /// The message catalog used to build error messages.
    pub fn messages(&self) -> &MessageCatalog {
        &self.core.messages
    }

    /// The rule set, once stored.
    ///
    /// Available from the moment the rule set is parsed, which includes the
    /// time the run-after continuation is running.
    pub fn rule_set(&self) -> Option<Arc<RuleSet>> {
        self.core
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers a continuation to run once the rule set is stored.
    ///
    /// The session becomes `Ready` only after the continuation's future
    /// completes; if it fails, the session fails. Registering again replaces
    /// the previous continuation. Returns `false` (and does nothing) if the
    /// continuation slot was already consumed because loading finished.
    pub fn register_run_after<F, Fut>(&self, run_after: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let mut slot = self
            .core
            .run_after
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match &mut *slot {
            RunAfterSlot::Open(current) => {
                *current = Some(Box::new(move || run_after().boxed()));
                true
            }
            RunAfterSlot::Consumed => {
                warn!(
                    "Validation: run-after registered after rule set <{}> finished loading; ignored",
                    self.core.rule_set_name
                );
                false
            }
        }
    }

    /// Loads the rule set if needed and waits until the session is `Ready`.
    ///
    /// Can be awaited any number of times, before or after completion.
    ///
    /// # Errors
    ///
    /// Returns the [`RuleSetLoadFailure`](crate::error::RuleSetLoadFailure)
    /// or run-after error that put the session in `Failed`.
    pub async fn on_ready(&self) -> Result<(), Error> {
        self.ready.clone().await
    }

    /// Evaluates a field value against its rule chain.
    ///
    /// Synchronous; never waits on anything. A value that breaks a rule is a
    /// normal, invalid [`Verdict`], not an error.
    ///
    /// # Errors
    ///
    /// - [`StateError`] if the session is not `Ready`.
    /// - [`ConfigError`](crate::error::ConfigError) if the field has no rule
    ///   chain or a `matches` rule references a field `siblings` can't resolve.
    pub fn run_validation(
        &self,
        field: &str,
        value: &str,
        siblings: &dyn FieldValues,
    ) -> Result<Verdict, Error> {
        let rules = self.core.ready_rules()?;
        let verdict =
            FieldEvaluator::new(&rules, &self.core.messages).evaluate(field, value, siblings)?;

        debug!("Validation: {} {:?}", field, verdict.is_valid);

        Ok(verdict)
    }

    /// Like [`run_validation`](Self::run_validation), and records the
    /// field's error text in the session's [`ErrorMessages`].
    pub fn validate_field(
        &self,
        field: &str,
        value: &str,
        siblings: &dyn FieldValues,
    ) -> Result<Verdict, Error> {
        let verdict = self.run_validation(field, value, siblings)?;
        self.core.errors.set(field, verdict.error_message.as_str());
        Ok(verdict)
    }

    /// Validates every field of the rule set, in field name order.
    ///
    /// Values come from `values`; a field it doesn't know is validated as
    /// empty. Every field's error text is recorded.
    pub fn validate_all(&self, values: &dyn FieldValues) -> Result<ValidationResult, Error> {
        let rules = self.core.ready_rules()?;
        let evaluator = FieldEvaluator::new(&rules, &self.core.messages);
        let mut errors = Vec::new();

        for field in rules.field_names() {
            let value = values.field_value(field).unwrap_or_default();
            let verdict = evaluator.evaluate(field, &value, values)?;

            self.core.errors.set(field, verdict.error_message.as_str());

            if verdict.is_invalid() {
                errors.push(FieldError {
                    field_name: field.to_string(),
                    message: verdict.error_message,
                });
            }
        }

        debug!(
            "Validation: rule set <{}> checked, {} invalid field(s)",
            self.core.rule_set_name,
            errors.len()
        );

        Ok(errors.into())
    }

    /// Validates a bound UI field and pushes the verdict back to it.
    ///
    /// Returns the field's value when it is valid and `None` otherwise, so
    /// invalid input never reaches the model.
    pub fn sync_binding(
        &self,
        binding: &dyn FieldBinding,
        siblings: &dyn FieldValues,
    ) -> Result<Option<String>, Error> {
        let field = binding.field_name();
        let value = binding.view_value();
        let verdict = self.validate_field(&field, &value, siblings)?;

        binding.apply_verdict(&verdict);

        Ok(verdict.is_valid().then_some(value))
    }

    /// Returns the current error text of a field.
    pub fn error_message(&self, field: &str) -> Option<String> {
        self.core.errors.get(field)
    }

    /// Returns the current error text of every validated field.
    pub fn error_messages(&self) -> BTreeMap<String, String> {
        self.core.errors.snapshot()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("rule_set", &self.core.rule_set_name)
            .field("status", &self.core.status())
            .finish()
    }
}

/// Loads the rule set, then runs the continuation, then marks the session ready.
async fn drive<F>(core: Arc<SessionCore>, load: F) -> Result<(), Error>
where
    F: Future<Output = Result<Arc<RuleSet>, Error>>,
{
    core.set_state(SessionState::Loading);

    let rules = match load.await {
        Ok(rules) => rules,
        Err(err) => return Err(core.fail(err)),
    };

    *core.loaded.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&rules));
    core.set_state(SessionState::Loaded);

    if let Some(run_after) = core.take_run_after() {
        debug!(
            "Validation: running run-after for rule set <{}>",
            core.rule_set_name
        );
        if let Err(source) = run_after().await {
            let err = Error::run_after(core.rule_set_name.as_str(), source);
            warn!("Validation: {}", err);
            return Err(core.fail(err));
        }
    }

    core.set_state(SessionState::Ready(rules));
    info!("Validation: rule set <{}> ready", core.rule_set_name);

    Ok(())
}
