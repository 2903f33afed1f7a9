//! Tracing subscriber setup for binaries and tests embedding the engine.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `"soul_engine=info"`) is used. Returns `false` if a global subscriber was
/// already installed, in which case nothing changes.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing("soul_engine=debug");
        assert!(!init_tracing("soul_engine=trace"));
    }
}
