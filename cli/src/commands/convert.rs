use std::fs::File;
use std::io::{BufWriter, Write};

use index_meta::Settings;

use crate::cli::{ConvertArgs, Format};
use crate::error::{Error, Result};
use crate::util::{format_for_path, format_size, load};

pub fn run(args: ConvertArgs, defaults: Option<&Settings>) -> Result<()> {
    let meta = load(&args.input, defaults)?;
    let format = args.to.unwrap_or_else(|| format_for_path(&args.output));

    let write_err = |source: index_meta::Error| Error::Write {
        path: args.output.clone(),
        source,
    };

    let file = File::create(&args.output).map_err(|e| write_err(e.into()))?;
    let mut writer = BufWriter::new(file);

    match format {
        Format::Json => meta.write_json(&mut writer, args.pretty).map_err(write_err)?,
        Format::Binary => {
            meta.write_to(&mut writer).map_err(write_err)?;
        }
    }

    writer.flush().map_err(|e| write_err(e.into()))?;
    drop(writer);

    let written = std::fs::metadata(&args.output).map(|m| m.len()).unwrap_or(0);
    tracing::info!(
        index = %meta.index(),
        output = %args.output.display(),
        ?format,
        "converted"
    );
    println!(
        "{} -> {} ({:?}, {})",
        args.input.display(),
        args.output.display(),
        format,
        format_size(written)
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_meta::IndexMetadata;

    #[test]
    fn json_to_binary_and_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut builder = IndexMetadata::builder("logs");
        builder
            .number_of_shards(3)
            .number_of_replicas(2)
            .put_mapping("doc", "{\"properties\":{}}");
        let meta = builder.build().unwrap();

        let json = dir.path().join("logs.json");
        std::fs::write(&json, meta.to_json_string_pretty()).unwrap();
        let binary = dir.path().join("logs.meta");
        let back = dir.path().join("back.json");

        run(
            ConvertArgs {
                input: json,
                output: binary.clone(),
                to: None,
                pretty: false,
            },
            None,
        )
        .unwrap();
        assert_eq!(std::fs::read(&binary).unwrap(), meta.to_bytes());

        run(
            ConvertArgs {
                input: binary,
                output: back.clone(),
                to: Some(Format::Json),
                pretty: true,
            },
            None,
        )
        .unwrap();
        let text = std::fs::read_to_string(&back).unwrap();
        assert_eq!(IndexMetadata::from_json_str(&text, None).unwrap(), meta);
    }
}
