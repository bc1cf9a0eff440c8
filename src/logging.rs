use tracing_subscriber::{
    fmt::writer::{BoxMakeWriter, MakeWriterExt},
    EnvFilter,
};

use std::{fs::OpenOptions, path::Path, sync::Arc};

/// Install the global subscriber. Logs go to stdout, and are also appended
/// to `log_file` when one is given. `RUST_LOG` overrides the `info` default.
pub fn init(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = BoxMakeWriter::new(std::io::stdout.and(Arc::new(file)));
            builder.with_ansi(false).with_writer(writer).try_init()
        }
        None => builder.try_init(),
    }
}
