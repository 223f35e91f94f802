#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

/// Default filter: per-key spans and lock changes from the decoder, table
/// builds from the rule layer. `RUST_LOG` overrides it.
#[cfg(feature = "trace")]
const DEFAULT_FILTER: &str = "brl_engine=debug,\
    brl_session::key_handlers=debug,\
    brl_session::resolver=debug,\
    brl_session=debug,\
    brl_core::table=debug";

/// Install a JSON-lines subscriber writing decoder traces to
/// `log_dir/brl-keys.jsonl`, one record per key event and chord.
/// Later calls are ignored.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) {
    INIT.call_once(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, "brl-keys.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        // flushed at process exit
        std::mem::forget(guard);

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(filter)
            .init();

        let table = crate::shared_table();
        tracing::info!(
            log_dir = %log_dir.display(),
            dictionary = %crate::settings().decoder.dictionary,
            dictionaries = ?table.dictionary_names().collect::<Vec<_>>(),
            "braille key trace started"
        );
    });
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) {}
