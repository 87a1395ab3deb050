use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result, ValidationReason};
use crate::settings::{Settings, SettingsBuilder};

pub const SETTING_NUMBER_OF_SHARDS: &str = "index.number_of_shards";
pub const SETTING_NUMBER_OF_REPLICAS: &str = "index.number_of_replicas";
pub const SETTING_ALIASES: &str = "index.aliases";

/// Mapping type name to its source text. The source is never parsed here.
pub type MappingMap = BTreeMap<String, String>;

/// The configuration of a single index: shard layout, settings and mappings.
///
/// Only [`IndexMetadataBuilder::build`] creates one, and nothing mutates it
/// afterwards. Updates go through [`to_builder`](IndexMetadata::to_builder)
/// and produce a new record, leaving this one untouched for its readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMetadata {
    index: String,
    settings: Settings,
    mappings: MappingMap,
    aliases: BTreeSet<String>,
    number_of_shards: u32,
    number_of_replicas: u32,
    total_number_of_shards: u32,
}

impl IndexMetadata {
    #[inline(always)]
    pub fn builder<S: Into<String>>(index: S) -> IndexMetadataBuilder {
        IndexMetadataBuilder::new(index)
    }

    #[inline(always)]
    pub fn to_builder(&self) -> IndexMetadataBuilder {
        IndexMetadataBuilder::from(self)
    }

    #[inline(always)]
    pub fn index(&self) -> &str {
        &self.index
    }

    #[inline(always)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline(always)]
    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    #[inline(always)]
    pub fn number_of_replicas(&self) -> u32 {
        self.number_of_replicas
    }

    /// Primaries plus all of their replicas.
    #[inline(always)]
    pub fn total_number_of_shards(&self) -> u32 {
        self.total_number_of_shards
    }

    #[inline(always)]
    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    #[inline(always)]
    pub fn mappings(&self) -> &MappingMap {
        &self.mappings
    }

    #[inline(always)]
    pub fn mapping(&self, mapping_type: &str) -> Option<&str> {
        self.mappings.get(mapping_type).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct IndexMetadataBuilder {
    index: String,
    settings: Settings,
    mappings: MappingMap,
}

impl IndexMetadataBuilder {
    pub fn new<S: Into<String>>(index: S) -> IndexMetadataBuilder {
        IndexMetadataBuilder {
            index: index.into(),
            settings: Settings::empty(),
            mappings: MappingMap::new(),
        }
    }

    #[inline(always)]
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn number_of_shards(&mut self, number_of_shards: i64) -> &mut Self {
        self.put_setting(SETTING_NUMBER_OF_SHARDS, number_of_shards)
    }

    /// The staged shard count, or `None` if it is unset or not a number.
    pub fn get_number_of_shards(&self) -> Option<i64> {
        self.staged_int(SETTING_NUMBER_OF_SHARDS)
    }

    pub fn number_of_replicas(&mut self, number_of_replicas: i64) -> &mut Self {
        self.put_setting(SETTING_NUMBER_OF_REPLICAS, number_of_replicas)
    }

    pub fn get_number_of_replicas(&self) -> Option<i64> {
        self.staged_int(SETTING_NUMBER_OF_REPLICAS)
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    #[inline(always)]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn put_mapping<K: Into<String>, V: Into<String>>(
        &mut self,
        mapping_type: K,
        mapping_source: V,
    ) -> &mut Self {
        self.mappings.insert(mapping_type.into(), mapping_source.into());
        self
    }

    pub fn remove_mapping(&mut self, mapping_type: &str) -> &mut Self {
        self.mappings.remove(mapping_type);
        self
    }

    #[inline(always)]
    pub fn mapping(&self, mapping_type: &str) -> Option<&str> {
        self.mappings.get(mapping_type).map(String::as_str)
    }

    /// Validates the staged state and snapshots it into a new record.
    ///
    /// The builder stays usable; building again after further changes yields
    /// an independent record.
    pub fn build(&self) -> Result<IndexMetadata> {
        if self.index.trim().is_empty() {
            return Err(self.invalid("index name", ValidationReason::EmptyName));
        }

        let number_of_shards = self.required_count(SETTING_NUMBER_OF_SHARDS)?;
        let number_of_replicas = self.required_count(SETTING_NUMBER_OF_REPLICAS)?;
        let total_number_of_shards = number_of_replicas
            .checked_add(1)
            .and_then(|copies| number_of_shards.checked_mul(copies))
            .ok_or_else(|| self.invalid(SETTING_NUMBER_OF_REPLICAS, ValidationReason::Overflow))?;

        let aliases = self
            .settings
            .get_as_array(SETTING_ALIASES)
            .into_iter()
            .collect();

        tracing::trace!(
            index = %self.index,
            number_of_shards,
            number_of_replicas,
            mappings = self.mappings.len(),
            "built index metadata"
        );

        Ok(IndexMetadata {
            index: self.index.clone(),
            settings: self.settings.clone(),
            mappings: self.mappings.clone(),
            aliases,
            number_of_shards,
            number_of_replicas,
            total_number_of_shards,
        })
    }

    fn put_setting(&mut self, key: &str, value: i64) -> &mut Self {
        let mut builder = SettingsBuilder::from(&self.settings);
        builder.put(key, value);
        self.settings = builder.build();
        self
    }

    fn staged_int(&self, key: &str) -> Option<i64> {
        self.settings.get(key)?;
        self.settings.get_as_int(key, 0).ok()
    }

    fn required_count(&self, key: &'static str) -> Result<u32> {
        let raw = self
            .settings
            .get(key)
            .ok_or_else(|| self.invalid(key, ValidationReason::Missing))?;

        let value = self
            .settings
            .get_as_int(key, 0)
            .map_err(|_| self.invalid(key, ValidationReason::NotANumber(raw.to_string())))?;

        if value < 0 {
            return Err(self.invalid(key, ValidationReason::Negative(value)));
        }

        u32::try_from(value).map_err(|_| self.invalid(key, ValidationReason::Overflow))
    }

    fn invalid(&self, field: &'static str, reason: ValidationReason) -> Error {
        Error::Validation {
            index: self.index.clone(),
            field,
            reason,
        }
    }
}

impl From<&IndexMetadata> for IndexMetadataBuilder {
    fn from(metadata: &IndexMetadata) -> Self {
        IndexMetadataBuilder {
            index: metadata.index.clone(),
            settings: metadata.settings.clone(),
            mappings: metadata.mappings.clone(),
        }
    }
}
