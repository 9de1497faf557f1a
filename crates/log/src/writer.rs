//! Constructs the `tracing_subscriber::fmt` writer for a [`crate::config::WriterConfig`].

use tracing_subscriber::fmt::MakeWriter;

use crate::config::WriterConfig;
use crate::core::LogResult;

/// The guard type produced alongside a writer. A plain `()` when the `file`
/// feature is disabled, since only the rolling-file appender needs one.
#[cfg(feature = "file")]
pub(crate) type FileGuard = tracing_appender::non_blocking::WorkerGuard;
#[cfg(not(feature = "file"))]
pub(crate) type FileGuard = ();

enum Writer {
    Stdout,
    Stderr,
    #[cfg(feature = "file")]
    File(tracing_appender::non_blocking::NonBlocking),
}

impl<'a> MakeWriter<'a> for Writer {
    type Writer = Box<dyn std::io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Writer::Stdout => Box::new(std::io::stdout()),
            Writer::Stderr => Box::new(std::io::stderr()),
            #[cfg(feature = "file")]
            Writer::File(writer) => Box::new(writer.clone()),
        }
    }
}

/// Builds the writer and any guards that must be kept alive for it to keep
/// flushing, for `config`.
pub(crate) fn make_writer(
    config: &WriterConfig,
) -> LogResult<(impl for<'a> MakeWriter<'a> + Send + Sync + 'static, Vec<FileGuard>)> {
    match config {
        WriterConfig::Stdout => Ok((Writer::Stdout, Vec::new())),
        WriterConfig::Stderr => Ok((Writer::Stderr, Vec::new())),
        #[cfg(feature = "file")]
        WriterConfig::File { path, rotation } => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "nebula.log".to_string());
            let appender = match rotation {
                crate::config::Rotation::Hourly => tracing_appender::rolling::hourly(dir, file_name),
                crate::config::Rotation::Daily => tracing_appender::rolling::daily(dir, file_name),
                crate::config::Rotation::Never => tracing_appender::rolling::never(dir, file_name),
            };
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            Ok((Writer::File(non_blocking), vec![guard]))
        }
    }
}
