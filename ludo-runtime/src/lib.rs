//! ludo-runtime: timer queue, sink traits, and the clock-driven runtime
//! around the ludo-core engine.

pub mod runtime;
pub mod timer;

pub use runtime::{FeedbackSink, NullFeedback, NullRender, RenderSink, Runtime};
pub use timer::{TimerEntry, TimerQueue};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
