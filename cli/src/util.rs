use std::path::Path;

use index_meta::{IndexMetadata, Settings};

use crate::cli::Format;
use crate::error::{Error, Result};

/// Guess the encoding of a metadata file from its first non-blank byte.
///
/// A JSON document always opens with `{`, possibly after whitespace. A binary
/// file opens with the varint length of the index name, and some lengths
/// encode to one of those bytes too, so this is only a first guess.
pub fn detect_format(data: &[u8]) -> Format {
    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Format::Json,
        _ => Format::Binary,
    }
}

/// The encoding implied by an output path's extension.
pub fn format_for_path(path: &Path) -> Format {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
        _ => Format::Binary,
    }
}

/// Decode either encoding. Input that looks like JSON but does not parse is
/// retried as binary, and the JSON error is reported if that fails too.
pub fn decode(data: &[u8], defaults: Option<&Settings>) -> index_meta::Result<IndexMetadata> {
    match detect_format(data) {
        Format::Binary => IndexMetadata::from_bytes(data, defaults),
        Format::Json => match IndexMetadata::from_json_reader(data, defaults) {
            Err(err @ index_meta::Error::MalformedText(_)) => {
                IndexMetadata::from_bytes(data, defaults).map_err(|_| err)
            }
            result => result,
        },
    }
}

pub fn load(path: &Path, defaults: Option<&Settings>) -> Result<IndexMetadata> {
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = data.len(), format = ?detect_format(&data), "loading");

    decode(&data, defaults).map_err(|source| Error::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_defaults(path: &Path) -> Result<Settings> {
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value = serde_json::from_slice(&data).map_err(|e| Error::Defaults {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    Settings::from_json_value(&value, None).map_err(|source| Error::Defaults {
        path: path.to_path_buf(),
        source,
    })
}

pub fn format_size(bytes: u64) -> String {
    use humansize::{BINARY, FormatSize};
    bytes.format_size(BINARY)
}
