//! Opt-in `tracing-subscriber` initializer for host processes (§7). The
//! library itself never installs a global subscriber — only emits spans and
//! events — so embedding hosts that already run their own subscriber aren't
//! fought over `set_global_default`.

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a `fmt` subscriber reading `RUST_LOG` (falling back to `info`),
/// human-readable. Call once, from `main`.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Same as `init`, but newline-delimited JSON — for hosts shipping logs to a
/// collector rather than a terminal.
pub fn init_json() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).json().init();
}
