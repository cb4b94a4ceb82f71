//! Core types: events, sources, photos, tracing

pub mod event;
pub mod photo;
pub mod source;
pub mod tracing;

pub use event::CalendarEvent;
pub use photo::Photo;
pub use source::CalendarSource;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

/// A boxed future for async trait methods.
///
/// Async functions in traits are not yet stable in a way that works well
/// with dynamic dispatch; boxed futures keep the pipeline traits
/// object-safe.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
