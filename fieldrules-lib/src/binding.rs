//! Interface to the UI binding layer
//!
//! The engine does not know about widgets. A UI layer implements
//! [`FieldBinding`] for each bound input and hands it to
//! [`Session::sync_binding`](crate::session::Session::sync_binding) whenever
//! the input's value changes.

use crate::model::Verdict;

/// Trait for UI inputs that are validated by a session.
///
/// # Example
///
/// ```ignore
/// struct TextInput {
///     name: String,
///     text: RwLock<String>,
///     error: RwLock<Option<String>>,
/// }
///
/// impl FieldBinding for TextInput {
///     fn field_name(&self) -> String {
///         self.name.clone()
///     }
///
///     fn view_value(&self) -> String {
///         self.text.read().unwrap().clone()
///     }
///
///     fn apply_verdict(&self, verdict: &Verdict) {
///         *self.error.write().unwrap() =
///             verdict.is_invalid().then(|| verdict.error_message.clone());
///     }
/// }
/// ```
pub trait FieldBinding: Send + Sync {
    /// The field name, which selects the rule chain.
    fn field_name(&self) -> String;

    /// The value currently shown in the input.
    fn view_value(&self) -> String;

    /// Shows a verdict: validity styling and error text.
    fn apply_verdict(&self, verdict: &Verdict);
}
