use crate::error::AppError;

/// Receiver for failures the store absorbs instead of propagating.
/// Injectable so tests can assert a failure happened without capturing
/// output streams.
pub trait DiagnosticSink {
    fn record(&self, context: &str, error: &AppError);
}

/// Default sink: one line per failure on stderr.
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn record(&self, context: &str, error: &AppError) {
        eprintln!("tasklist: {context}: {error}");
    }
}

pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _context: &str, _error: &AppError) {}
}
