//! Green Calculator entry point: CLI wiring, logging, and config-driven
//! dispatcher construction.

use std::net::{IpAddr, SocketAddr};
use std::process;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use green_calc::api::AppState;
use green_calc::cli::{parse_args, print_usage};
use green_calc::config::AppConfig;
use green_calc::dispatch::Dispatcher;
use green_calc::io::batch::run_batch;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "green_calc=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    init_tracing();

    // Load config: --config file if given, otherwise built-in defaults
    let mut config = match cli.config {
        Some(ref path) => match AppConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let dispatcher = Dispatcher::from_config(&config.models);
    for (ty, binding) in dispatcher.bindings().iter() {
        tracing::info!(
            energy_type = %ty,
            path = %binding.path.display(),
            co2_factor = binding.co2_factor,
            available = dispatcher.is_available(ty),
            "model binding"
        );
    }

    if let Some(ref input) = cli.batch {
        match run_batch(&dispatcher, input, cli.out.as_deref()) {
            Ok(summary) => {
                eprintln!("{summary}");
                if let Some(ref path) = cli.out {
                    eprintln!("Results written to {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("error: batch failed: {e}");
                process::exit(1);
            }
        }
        return;
    }

    // Host was validated above.
    let ip: IpAddr = match config.server.host.parse() {
        Ok(ip) => ip,
        Err(e) => {
            eprintln!("error: invalid server.host: {e}");
            process::exit(1);
        }
    };
    let addr = SocketAddr::new(ip, config.server.port);
    let state = Arc::new(AppState { dispatcher });

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(green_calc::api::serve(state, addr)) {
        eprintln!("error: server failed on {addr}: {e}");
        process::exit(1);
    }
}
