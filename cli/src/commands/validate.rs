use index_meta::Settings;

use crate::cli::ValidateArgs;
use crate::error::{Error, Result};
use crate::util::load;

pub fn run(args: ValidateArgs, defaults: Option<&Settings>) -> Result<()> {
    let total = args.files.len();
    let mut failed = 0;

    for path in &args.files {
        match load(path, defaults) {
            Ok(meta) => {
                if !args.quiet {
                    println!(
                        "ok    {} [{}: {} shards]",
                        path.display(),
                        meta.index(),
                        meta.total_number_of_shards()
                    );
                }
            }
            Err(err) => {
                failed += 1;
                let cause = match &err {
                    Error::Read { source, .. } => source.to_string(),
                    Error::Metadata { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                tracing::debug!(path = %path.display(), error = ?err, "validation failed");
                println!("FAIL  {}: {}", path.display(), cause);
            }
        }
    }

    if failed > 0 {
        return Err(Error::ValidationFailed { failed, total });
    }

    Ok(())
}
