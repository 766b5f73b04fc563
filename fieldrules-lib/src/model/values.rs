//! Access to the current values of other fields in a form

use std::borrow::Borrow;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::hash::Hash;

/// Read access to the live values of a form's fields.
///
/// Passed into every evaluation so a `matches` rule compares against what the
/// referenced field holds *now*. Returning `None` means the form has no such
/// field, which is a wiring error; a field that exists but is empty should
/// return an empty string.
///
/// Implemented for `HashMap`/`BTreeMap` of string-like keys and values, for
/// `()` (a form with no other fields), and for closures via [`FnValues`].
pub trait FieldValues {
    /// Returns the current value of a field.
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl FieldValues for () {
    fn field_value(&self, _field: &str) -> Option<Cow<'_, str>> {
        None
    }
}

impl<K, V, S> FieldValues for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

impl<K, V> FieldValues for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

/// Adapts a closure into [`FieldValues`].
///
/// # Example
///
/// ```
/// use fieldrules_lib::model::{FieldValues, FnValues};
///
/// let values = FnValues(|field: &str| (field == "password").then(|| "hunter2".to_string()));
/// assert_eq!(values.field_value("password").as_deref(), Some("hunter2"));
/// assert_eq!(values.field_value("email"), None);
/// ```
pub struct FnValues<F>(pub F);

impl<F> FieldValues for FnValues<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        (self.0)(field).map(Cow::Owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup() {
        let mut values = HashMap::new();
        values.insert("password".to_string(), "secret".to_string());
        assert_eq!(values.field_value("password").as_deref(), Some("secret"));
        assert_eq!(values.field_value("email"), None);

        let borrowed: BTreeMap<&str, &str> = [("a", "1")].into_iter().collect();
        assert_eq!(borrowed.field_value("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_unit_has_no_fields() {
        assert_eq!(().field_value("anything"), None);
    }
}
