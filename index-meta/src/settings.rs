//! A minimal flat settings store.
//!
//! Keys are dotted strings (`index.number_of_shards`) and every value is held
//! as text; typed accessors convert on read. Multi-value settings are stored
//! as numbered keys (`index.aliases.0`, `index.aliases.1`, ...).

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    map: BTreeMap<String, String>,
}

impl Settings {
    #[inline(always)]
    pub fn empty() -> Settings {
        Settings::default()
    }

    #[inline(always)]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    #[inline(always)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Returns `default` when the key is absent, and an error when it is
    /// present but does not parse as an integer.
    pub fn get_as_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|_| Error::InvalidSetting {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Collects `key.0`, `key.1`, ... until the first gap. Falls back to a
    /// comma-delimited value stored directly under `key`.
    pub fn get_as_array(&self, key: &str) -> Vec<String> {
        let mut values = Vec::new();
        loop {
            match self.map.get(&format!("{}.{}", key, values.len())) {
                Some(v) => values.push(v.clone()),
                None => break,
            }
        }

        if values.is_empty() {
            if let Some(v) = self.get(key) {
                values.extend(
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
            }
        }

        values
    }

    #[inline(always)]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    map: BTreeMap<String, String>,
    globals: Option<Settings>,
}

impl SettingsBuilder {
    pub fn put<K: Into<String>, V: ToString>(&mut self, key: K, value: V) -> &mut Self {
        self.map.insert(key.into(), value.to_string());
        self
    }

    pub fn put_all(&mut self, settings: &Settings) -> &mut Self {
        self.map
            .extend(settings.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Replaces any existing values of the multi-value setting `key`.
    pub fn put_array<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        self.remove_array(key);
        for (i, value) in values.iter().enumerate() {
            self.map
                .insert(format!("{}.{}", key, i), value.as_ref().to_string());
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.map.remove(key);
        self
    }

    /// Defaults merged under the explicit entries when the store is built.
    pub fn global_settings(&mut self, globals: Option<&Settings>) -> &mut Self {
        self.globals = globals.cloned();
        self
    }

    pub fn build(&self) -> Settings {
        let mut map = match &self.globals {
            Some(globals) => globals.map.clone(),
            None => BTreeMap::new(),
        };
        map.extend(self.map.iter().map(|(k, v)| (k.clone(), v.clone())));
        Settings { map }
    }

    fn remove_array(&mut self, key: &str) {
        self.map.remove(key);
        let prefix = format!("{}.", key);
        self.map.retain(|k, _| {
            !(k.starts_with(&prefix) && k[prefix.len()..].bytes().all(|b| b.is_ascii_digit()))
        });
    }
}

impl From<&Settings> for SettingsBuilder {
    fn from(settings: &Settings) -> Self {
        SettingsBuilder {
            map: settings.map.clone(),
            globals: None,
        }
    }
}
