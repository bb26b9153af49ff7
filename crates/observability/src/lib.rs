//! Process-wide logging setup for the storefront binaries.

pub mod tracing;

pub use self::tracing::DEFAULT_FILTER;

/// Install JSON logging with the [`DEFAULT_FILTER`] unless `RUST_LOG` says
/// otherwise. Repeated calls are no-ops.
pub fn init() {
    self::tracing::init_with(DEFAULT_FILTER);
}
