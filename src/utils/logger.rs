//! Log setup for the CLI. `RUST_LOG` overrides the default directives.
//! Logs go to stderr; stdout carries command output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn directives(verbose: bool) -> &'static str {
    if verbose {
        "small_shop=debug,info"
    } else {
        "small_shop=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

/// One JSON object per line, for log collectors.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}
