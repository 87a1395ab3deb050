//! JSON form of index metadata.
//!
//! ```text
//! { "<index>": { "settings": { "<key>": "<value>", ... },
//!                "mappings": { "<type>": { "source": "<text>" }, ... } } }
//! ```
//!
//! Settings values are always written as strings. Object keys come out
//! sorted, so encoding the same record twice gives identical text.

use std::io::{Read, Write};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::settings::SettingsBuilder;
use crate::{IndexMetadata, IndexMetadataBuilder, Settings};

const SETTINGS_FIELD: &str = "settings";
const MAPPINGS_FIELD: &str = "mappings";
const SOURCE_FIELD: &str = "source";

fn malformed<S: Into<String>>(message: S) -> Error {
    Error::MalformedText(message.into())
}

fn flatten_setting(builder: &mut SettingsBuilder, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            builder.put(key, s);
        }
        Value::Number(n) => {
            builder.put(key, n);
        }
        Value::Bool(b) => {
            builder.put(key, b);
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_setting(builder, &format!("{}.{}", key, i), item);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                flatten_setting(builder, &format!("{}.{}", key, k), v);
            }
        }
    }
}

impl Settings {
    /// Flat `{ key: "value" }` object, one entry per held setting.
    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        )
    }

    /// Load settings from a JSON object, merging `globals` underneath.
    ///
    /// Scalars are kept as their text, arrays become numbered keys
    /// (`key.0`, `key.1`, ...) and nested objects become dotted keys.
    pub fn from_json_value(value: &Value, globals: Option<&Settings>) -> Result<Settings> {
        let map = value
            .as_object()
            .ok_or_else(|| malformed("settings must be an object"))?;

        let mut builder = Settings::builder();
        builder.global_settings(globals);
        for (key, value) in map {
            flatten_setting(&mut builder, key, value);
        }
        Ok(builder.build())
    }
}

impl IndexMetadataBuilder {
    /// Stage an index from the body object found under its name.
    ///
    /// Unknown fields are ignored. This does not validate; call
    /// [`build`](IndexMetadataBuilder::build) for that.
    pub fn from_json_value<S: Into<String>>(
        index: S,
        body: &Value,
        globals: Option<&Settings>,
    ) -> Result<IndexMetadataBuilder> {
        let mut builder = IndexMetadataBuilder::new(index);
        let body = body
            .as_object()
            .ok_or_else(|| malformed(format!("index [{}] must be an object", builder.index())))?;

        for (field, value) in body {
            match field.as_str() {
                SETTINGS_FIELD => {
                    builder.settings(Settings::from_json_value(value, globals)?);
                }
                MAPPINGS_FIELD => {
                    let mappings = value
                        .as_object()
                        .ok_or_else(|| malformed("mappings must be an object"))?;
                    for (mapping_type, mapping) in mappings {
                        let mapping = mapping.as_object().ok_or_else(|| {
                            malformed(format!("mapping [{}] must be an object", mapping_type))
                        })?;
                        match mapping.get(SOURCE_FIELD) {
                            None | Some(Value::Null) => {
                                // TODO: decide whether a mapping without a source should be an error.
                                tracing::warn!(
                                    index = %builder.index(),
                                    %mapping_type,
                                    "dropping mapping without a source"
                                );
                            }
                            Some(Value::String(source)) => {
                                builder.put_mapping(mapping_type.as_str(), source.as_str());
                            }
                            Some(_) => {
                                return Err(malformed(format!(
                                    "source of mapping [{}] must be a string",
                                    mapping_type
                                )));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        // Settings must merge globals even when the document has no settings section.
        if !body.contains_key(SETTINGS_FIELD) {
            if let Some(globals) = globals {
                builder.settings(globals.clone());
            }
        }

        Ok(builder)
    }

    /// Stage an index from a whole `{ "<index>": { ... } }` document.
    pub fn from_json_document(
        document: &Value,
        globals: Option<&Settings>,
    ) -> Result<IndexMetadataBuilder> {
        let map = document
            .as_object()
            .ok_or_else(|| malformed("expected an object keyed by index name"))?;

        let mut entries = map.iter();
        match (entries.next(), entries.next()) {
            (Some((index, body)), None) => {
                IndexMetadataBuilder::from_json_value(index.as_str(), body, globals)
            }
            (None, _) => Err(malformed("expected an index name, found an empty object")),
            (Some(_), Some(_)) => Err(malformed(format!(
                "expected a single index, found {}",
                map.len()
            ))),
        }
    }

    pub fn from_json_str(text: &str, globals: Option<&Settings>) -> Result<IndexMetadataBuilder> {
        let document: Value = serde_json::from_str(text)?;
        IndexMetadataBuilder::from_json_document(&document, globals)
    }

    pub fn from_json_reader<R: Read>(
        reader: R,
        globals: Option<&Settings>,
    ) -> Result<IndexMetadataBuilder> {
        let document: Value = serde_json::from_reader(reader)?;
        IndexMetadataBuilder::from_json_document(&document, globals)
    }
}

impl IndexMetadata {
    pub fn to_json_value(&self) -> Value {
        let mappings: Map<String, Value> = self
            .mappings()
            .iter()
            .map(|(mapping_type, source)| {
                let mut mapping = Map::new();
                mapping.insert(SOURCE_FIELD.to_string(), Value::String(source.clone()));
                (mapping_type.clone(), Value::Object(mapping))
            })
            .collect();

        let mut body = Map::new();
        body.insert(SETTINGS_FIELD.to_string(), self.settings().to_json_value());
        body.insert(MAPPINGS_FIELD.to_string(), Value::Object(mappings));

        let mut document = Map::new();
        document.insert(self.index().to_string(), Value::Object(body));
        Value::Object(document)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    pub fn to_json_string_pretty(&self) -> String {
        // Serializing a Value with string keys cannot fail.
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_default()
    }

    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let value = self.to_json_value();
        if pretty {
            serde_json::to_writer_pretty(writer, &value)?;
        } else {
            serde_json::to_writer(writer, &value)?;
        }
        Ok(())
    }

    /// Decode a `{ "<index>": { ... } }` document and build it.
    pub fn from_json_str(text: &str, globals: Option<&Settings>) -> Result<IndexMetadata> {
        IndexMetadataBuilder::from_json_str(text, globals)?.build()
    }

    pub fn from_json_reader<R: Read>(reader: R, globals: Option<&Settings>) -> Result<IndexMetadata> {
        IndexMetadataBuilder::from_json_reader(reader, globals)?.build()
    }

    pub fn from_json_value<S: Into<String>>(
        index: S,
        body: &Value,
        globals: Option<&Settings>,
    ) -> Result<IndexMetadata> {
        IndexMetadataBuilder::from_json_value(index, body, globals)?.build()
    }
}
