use std::io::{self, Read};

use fastvlq::{decode_vu64_slice, ReadVu64Ext};

use crate::counting::CountingReader;
use crate::error::{Error, Result};
use crate::{IndexMetadata, IndexMetadataBuilder, Settings};

/// Read a VLQ-encoded u64 from a byte slice, advancing the position.
fn read_vlq_u64(data: &[u8], pos: &mut usize, context: &'static str) -> Result<u64> {
    let (value, len) = data
        .get(*pos..)
        .and_then(decode_vu64_slice)
        .ok_or(Error::TruncatedStream { context })?;
    *pos += len;
    Ok(value)
}

/// Read a length-prefixed UTF-8 string, borrowing from `data`.
fn read_str<'a>(data: &'a [u8], pos: &mut usize, context: &'static str) -> Result<&'a str> {
    let len = read_vlq_u64(data, pos, context)?;
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| pos.checked_add(len))
        .filter(|end| *end <= data.len())
        .ok_or(Error::TruncatedStream { context })?;

    let bytes = &data[*pos..end];
    *pos = end;
    std::str::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("{}: {}", context, e)))
}

/// A short read while decoding `context` means the stream ended early.
fn eof_as_truncated(context: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedStream { context },
        _ => Error::Io(e),
    }
}

fn read_vlq_u64_from<R: Read>(reader: &mut R, context: &'static str) -> Result<u64> {
    reader.read_vu64().map_err(eof_as_truncated(context))
}

/// Read a length-prefixed UTF-8 string, consuming exactly its bytes.
fn read_string_from<R: Read>(reader: &mut R, context: &'static str) -> Result<String> {
    let len = read_vlq_u64_from(reader, context)?;

    // Bounded by `take` so a corrupt length cannot force a huge allocation.
    let mut bytes = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut bytes)?;
    if (bytes.len() as u64) < len {
        return Err(Error::TruncatedStream { context });
    }

    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("{}: {}", context, e)))
}

/// Decoding from a byte slice, where decoding a value may need the
/// global settings that were in effect when it was written.
pub(crate) trait DeserializeBorrowed: Sized {
    fn deserialize_borrowed(data: &[u8], pos: &mut usize, globals: Option<&Settings>)
        -> Result<Self>;
}

impl DeserializeBorrowed for Settings {
    fn deserialize_borrowed(
        data: &[u8],
        pos: &mut usize,
        globals: Option<&Settings>,
    ) -> Result<Self> {
        let start = *pos;
        let len = read_vlq_u64(data, pos, "settings count")?;

        let mut builder = Settings::builder();
        builder.global_settings(globals);
        for _ in 0..len {
            let key = read_str(data, pos, "setting key")?;
            let value = read_str(data, pos, "setting value")?;
            builder.put(key, value);
        }

        tracing::debug!(bytes = *pos - start, count = len, "deserialized Settings");
        Ok(builder.build())
    }
}

impl DeserializeBorrowed for IndexMetadataBuilder {
    fn deserialize_borrowed(
        data: &[u8],
        pos: &mut usize,
        globals: Option<&Settings>,
    ) -> Result<Self> {
        let start = *pos;
        let index = read_str(data, pos, "index name")?;
        let mut builder = IndexMetadataBuilder::new(index);
        builder.settings(Settings::deserialize_borrowed(data, pos, globals)?);

        let len = read_vlq_u64(data, pos, "mapping count")?;
        for _ in 0..len {
            let mapping_type = read_str(data, pos, "mapping type")?;
            let mapping_source = read_str(data, pos, "mapping source")?;
            builder.put_mapping(mapping_type, mapping_source);
        }

        tracing::debug!(
            %index,
            bytes = *pos - start,
            mappings = len,
            "deserialized IndexMetadata"
        );
        Ok(builder)
    }
}

/// Decoding straight from a reader, leaving it positioned after the value.
pub(crate) trait DeserializeOwned: Sized {
    fn deserialize_owned<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<Self>;
}

impl DeserializeOwned for Settings {
    fn deserialize_owned<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<Self> {
        let len = read_vlq_u64_from(reader, "settings count")?;

        let mut builder = Settings::builder();
        builder.global_settings(globals);
        for _ in 0..len {
            let key = read_string_from(reader, "setting key")?;
            let value = read_string_from(reader, "setting value")?;
            builder.put(key, value);
        }

        Ok(builder.build())
    }
}

impl DeserializeOwned for IndexMetadataBuilder {
    fn deserialize_owned<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<Self> {
        let index = read_string_from(reader, "index name")?;
        let mut builder = IndexMetadataBuilder::new(index);
        builder.settings(Settings::deserialize_owned(reader, globals)?);

        let len = read_vlq_u64_from(reader, "mapping count")?;
        for _ in 0..len {
            let mapping_type = read_string_from(reader, "mapping type")?;
            let mapping_source = read_string_from(reader, "mapping source")?;
            builder.put_mapping(mapping_type, mapping_source);
        }

        Ok(builder)
    }
}

impl Settings {
    /// Read settings written by [`Settings::write_to`], merging `globals`
    /// under the decoded entries. Returns the settings and the bytes consumed.
    pub fn from_bytes(data: &[u8], globals: Option<&Settings>) -> Result<(Settings, usize)> {
        let mut pos = 0;
        let settings = Settings::deserialize_borrowed(data, &mut pos, globals)?;
        Ok((settings, pos))
    }

    /// Read one settings block from `reader`, leaving it at the next byte.
    pub fn read_from<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<Settings> {
        let mut reader = CountingReader::new(reader);
        let settings = Settings::deserialize_owned(&mut reader, globals)?;
        tracing::debug!(
            bytes = reader.bytes_read(),
            count = settings.len(),
            "read Settings"
        );
        Ok(settings)
    }
}

impl IndexMetadataBuilder {
    /// Decode the binary form without validating it.
    ///
    /// Returns the staged builder and the number of bytes consumed.
    pub fn from_bytes(data: &[u8], globals: Option<&Settings>) -> Result<(Self, usize)> {
        let mut pos = 0;
        let builder = IndexMetadataBuilder::deserialize_borrowed(data, &mut pos, globals)?;
        Ok((builder, pos))
    }

    /// Decode one record from `reader` without validating it. The reader is
    /// left at the first byte after the record, so records written back to
    /// back can be read in turn.
    pub fn read_from<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<Self> {
        let mut reader = CountingReader::new(reader);
        let builder = IndexMetadataBuilder::deserialize_owned(&mut reader, globals)?;
        tracing::debug!(
            index = %builder.index(),
            bytes = reader.bytes_read(),
            "read IndexMetadata"
        );
        Ok(builder)
    }
}

impl IndexMetadata {
    /// Decode the binary form and build it.
    pub fn from_bytes(data: &[u8], globals: Option<&Settings>) -> Result<IndexMetadata> {
        let (builder, pos) = IndexMetadataBuilder::from_bytes(data, globals)?;
        if pos != data.len() {
            tracing::debug!(
                index = %builder.index(),
                trailing = data.len() - pos,
                "ignoring trailing bytes after IndexMetadata"
            );
        }
        builder.build()
    }

    pub fn read_from<R: Read>(reader: &mut R, globals: Option<&Settings>) -> Result<IndexMetadata> {
        IndexMetadataBuilder::read_from(reader, globals)?.build()
    }
}
