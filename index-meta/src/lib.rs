//! Metadata describing a single index: how many shards and replicas it has,
//! its settings, and its mapping definitions.
//!
//! Records are staged with an [IndexMetadataBuilder] and frozen by
//! [IndexMetadataBuilder::build] into an [IndexMetadata]. A record can be
//! written as JSON (`to_json_*` / `from_json_*`) or in a compact binary form
//! (`write_to` / `from_bytes`).

#[cfg(feature = "reader")]
mod counting;
#[cfg(feature = "reader")]
mod de;
mod error;
mod json;
mod metadata;
#[cfg(feature = "writer")]
mod ser;
pub mod settings;

pub use error::{Error, Result, ValidationReason};
pub use metadata::{
    IndexMetadata, IndexMetadataBuilder, MappingMap, SETTING_ALIASES, SETTING_NUMBER_OF_REPLICAS,
    SETTING_NUMBER_OF_SHARDS,
};
pub use settings::{Settings, SettingsBuilder};
