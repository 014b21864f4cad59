//! Library half of the `jsb` binary.
//!
//! Command handlers live in [`commands`] so they can be driven from tests;
//! `main.rs` only parses the command word and reports errors.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// The filter comes from `JSB_LOG`, falling back to `RUST_LOG`; with neither
/// set nothing is installed. `JSB_LOG_TREE=1` switches to the hierarchical
/// span view. Output always goes to stderr. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Some(filter) = ["JSB_LOG", "RUST_LOG"]
            .into_iter()
            .find_map(|var| EnvFilter::try_from_env(var).ok())
        else {
            return;
        };

        let registry = tracing_subscriber::registry().with(filter);
        if std::env::var("JSB_LOG_TREE").is_ok_and(|v| v == "1") {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true)
                        .with_thread_names(true),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_names(true),
                )
                .init();
        }
    });
}
