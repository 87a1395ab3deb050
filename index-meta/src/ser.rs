use std::io::Write;

use fastvlq::WriteVu64Ext;

use crate::counting::CountingWriter;
use crate::error::Result;
use crate::{IndexMetadata, MappingMap, Settings};

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl Serialize for str {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_vu64(self.len() as u64)?;
        writer.write_all(self.as_bytes())
    }
}

impl Serialize for String {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.as_str().write(writer)
    }
}

impl Serialize for Settings {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_vu64(self.len() as u64)?;

        for (key, value) in self.iter() {
            key.write(writer)?;
            value.write(writer)?;
        }
        Ok(())
    }
}

impl Serialize for MappingMap {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_vu64(self.len() as u64)?;

        for (mapping_type, source) in self.iter() {
            mapping_type.write(writer)?;
            source.write(writer)?;
        }
        Ok(())
    }
}

impl Serialize for IndexMetadata {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.index().write(writer)?;
        self.settings().write(writer)?;
        self.mappings().write(writer)
    }
}

impl Settings {
    /// Write the settings as `[count]{[key][value]}*`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        Serialize::write(self, writer)?;
        Ok(())
    }
}

impl IndexMetadata {
    /// Write the binary form: name, settings, then each mapping's type and source.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let mut writer = CountingWriter::new(writer);
        Serialize::write(self, &mut writer)?;
        writer.flush()?;

        tracing::debug!(
            index = %self.index(),
            bytes = writer.bytes_written(),
            settings = self.settings().len(),
            mappings = self.mappings().len(),
            "serialized IndexMetadata"
        );

        Ok(writer.bytes_written())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writes into a Vec cannot fail.
        Serialize::write(self, &mut buf).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_is_length_prefixed() {
        let mut buf = Vec::new();
        "doc".write(&mut buf).unwrap();
        assert!(buf.len() > 3);
        assert!(buf.ends_with(b"doc"));
    }

    #[test]
    fn empty_settings_write_a_zero_count() {
        let mut buf = Vec::new();
        Settings::empty().write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn write_to_reports_bytes_written() {
        let mut builder = IndexMetadata::builder("logs");
        builder
            .number_of_shards(3)
            .number_of_replicas(2)
            .put_mapping("doc", "{}");
        let meta = builder.build().unwrap();

        let mut out = Vec::new();
        let written = meta.write_to(&mut out).unwrap();
        assert_eq!(written as usize, out.len());
        assert_eq!(out, meta.to_bytes());
    }
}
