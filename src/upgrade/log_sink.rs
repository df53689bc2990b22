use tracing::Level;

/// Destination for the updater's progress messages.
///
/// The updater is silent unless the host hands it a sink. [`NoopSink`] is the
/// default; [`TracingSink`] forwards to the `tracing` subscriber the host has
/// installed.
pub trait LogSink: Send + Sync {
    /// Record one message.
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Emits messages as `tracing` events with target `cliupdater`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!(target: "cliupdater", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "cliupdater", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "cliupdater", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "cliupdater", "{message}");
        } else {
            tracing::trace!(target: "cliupdater", "{message}");
        }
    }
}
