//! Process-wide default sink
//!
//! Optional. Nothing is installed until [`install`] or [`init`] is called,
//! and [`shutdown`] flushes and removes it again. Code that can take a
//! `&RotatingLogSink` should prefer that over [`current`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::LogConfig;
use crate::error::Result;

use super::RotatingLogSink;

static DEFAULT_SINK: RwLock<Option<Arc<RotatingLogSink>>> = parking_lot::const_rwlock(None);

/// Install `sink` as the process-wide default, replacing any previous one
pub fn install(sink: RotatingLogSink) -> Arc<RotatingLogSink> {
    let sink = Arc::new(sink);
    *DEFAULT_SINK.write() = Some(Arc::clone(&sink));
    sink
}

/// Open a sink from `config` and install it
pub fn init(config: LogConfig) -> Result<Arc<RotatingLogSink>> {
    Ok(install(RotatingLogSink::open(config)?))
}

/// The installed default, if any
pub fn current() -> Option<Arc<RotatingLogSink>> {
    DEFAULT_SINK.read().clone()
}

/// Remove the default and close its file
///
/// Handles obtained earlier through [`current`] keep working, console only.
pub fn shutdown() -> Result<()> {
    let sink = DEFAULT_SINK.write().take();
    match sink {
        Some(sink) => sink.close(),
        None => Ok(()),
    }
}
