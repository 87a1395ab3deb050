use std::fmt::Write as _;

use index_meta::{IndexMetadata, Settings};

use crate::cli::InfoArgs;
use crate::error::Result;
use crate::util::{format_size, load};

/// Render a human-readable summary of an index.
fn render(meta: &IndexMetadata, sources: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Index:    {}", meta.index());
    let _ = writeln!(
        out,
        "Shards:   {} primaries, {} replicas each ({} total)",
        meta.number_of_shards(),
        meta.number_of_replicas(),
        meta.total_number_of_shards()
    );

    if meta.aliases().is_empty() {
        let _ = writeln!(out, "Aliases:  (none)");
    } else {
        let aliases: Vec<&str> = meta.aliases().iter().map(String::as_str).collect();
        let _ = writeln!(out, "Aliases:  {}", aliases.join(", "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Settings:");
    for (key, value) in meta.settings().iter() {
        let _ = writeln!(out, "  {} = {}", key, value);
    }

    let _ = writeln!(out);
    if meta.mappings().is_empty() {
        let _ = writeln!(out, "Mappings: (none)");
    } else {
        let _ = writeln!(out, "Mappings:");
        for (mapping_type, source) in meta.mappings() {
            let _ = writeln!(
                out,
                "  {} ({})",
                mapping_type,
                format_size(source.len() as u64)
            );
            if sources {
                let _ = writeln!(out, "    {}", source);
            }
        }
    }

    out
}

pub fn run(args: InfoArgs, defaults: Option<&Settings>) -> Result<()> {
    let meta = load(&args.file, defaults)?;
    print!("{}", render(&meta, args.sources));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_layout_and_mappings() {
        let mut builder = IndexMetadata::builder("logs");
        builder
            .number_of_shards(3)
            .number_of_replicas(2)
            .put_mapping("doc", "{\"properties\":{}}");
        let meta = builder.build().unwrap();

        let text = render(&meta, true);
        assert!(text.contains("Index:    logs"));
        assert!(text.contains("(9 total)"));
        assert!(text.contains("Aliases:  (none)"));
        assert!(text.contains("index.number_of_shards = 3"));
        assert!(text.contains("  doc ("));
        assert!(text.contains("{\"properties\":{}}"));

        assert!(!render(&meta, false).contains("{\"properties\":{}}"));
    }
}
