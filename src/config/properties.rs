use std::collections::BTreeMap;

/// One loosely-typed property value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Double(v) => Some(*v as i64),
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}

/// String-keyed property bag used wherever services hand values to loosely coupled
/// collaborators (effect engines, pattern producers).
///
/// Keys are kept sorted so snapshots and JSON dumps are deterministic.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Properties {
    values: BTreeMap<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, or remove it when `value` is `None`.
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match value {
            Some(v) => {
                self.values.insert(key, v);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, Some(Value::Int(value)));
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, Some(Value::Double(value)));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Some(Value::String(value.into())));
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Integer view of `key`; absent or unparsable values read as 0.
    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_int).unwrap_or(0)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_double)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(Value::as_string)
    }

    /// Copy every `prefix*` entry of `src` into `self` with the prefix stripped.
    ///
    /// Returns the number of entries copied.
    pub fn pass(&mut self, src: &Properties, prefix: &str) -> usize {
        let mut n = 0;
        for (k, v) in src.with_prefix(prefix) {
            if let Some(stripped) = k.strip_prefix(prefix)
                && !stripped.is_empty()
            {
                self.values.insert(stripped.to_string(), v.clone());
                n += 1;
            }
        }
        n
    }

    /// Iterate entries whose key starts with `prefix`, in key order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.values
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/properties.rs"]
mod tests;
