use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug,hyper=warn,hyper_util=warn,reqwest=warn");
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the stderr subscriber. `RUST_LOG` wins unless `verbose` is set.
/// Stdout stays reserved for command output.
pub fn init_logging(verbose: bool) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(stderr_layer)
        .try_init();

    if let Err(err) = result {
        eprintln!("Failed to initialise logging: {err}");
    }
}
