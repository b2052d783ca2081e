//! The flat field map returned by one backend read.

use std::collections::HashMap;
use std::fmt;
use zeroize::Zeroize;

/// Field name → value pairs read from a single secret path.
///
/// A record is created per request by the backend client, handed to the
/// mapper once and dropped. Values are zeroed on drop and never formatted:
/// `Debug` lists field names only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretRecord {
    fields: HashMap<String, String>,
}

impl SecretRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SecretRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl From<HashMap<String, String>> for SecretRecord {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord").field("fields", &self.field_names()).finish()
    }
}

impl Drop for SecretRecord {
    fn drop(&mut self) {
        for value in self.fields.values_mut() {
            value.zeroize();
        }
    }
}
