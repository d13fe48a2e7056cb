use anyhow::Result;
use clap::Parser;
use netplan_server::{create_router, Config};
use std::sync::Arc;
use tower::ServiceExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "/etc/netplan/config.yaml";

/// Network planner - subnet partitioning and router addressing API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Unix socket path for API communication
    #[arg(short = 's', long)]
    unix_socket: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netplan_server=debug,netplan_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting network planner");

    // Load configuration - try specified path, then current directory
    let config_path = if std::path::Path::new(&args.config).exists() {
        args.config.clone()
    } else if args.config == DEFAULT_CONFIG_PATH {
        let current_dir_config = "config.yaml";
        if std::path::Path::new(current_dir_config).exists() {
            info!(
                "Config not found at {}, using {}",
                args.config, current_dir_config
            );
            current_dir_config.to_string()
        } else {
            args.config.clone()
        }
    } else {
        args.config.clone()
    };

    let mut config = match Config::from_file(&config_path) {
        Ok(cfg) => {
            info!("Loaded configuration from {}", config_path);
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path, e);
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(socket_path) = args.unix_socket {
        config.api.unix_socket = Some(socket_path);
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    info!(
        "Planner limits: max {} subnets per partition, strict interfaces: {}",
        config.planner.max_subnets, config.planner.strict_interfaces
    );

    let config = Arc::new(config);
    let app = create_router(Arc::clone(&config));

    // Start Unix socket listener if configured
    if let Some(socket_path) = config.api.unix_socket.clone() {
        // Remove existing socket file if it exists
        let _ = std::fs::remove_file(&socket_path);

        let listener = tokio::net::UnixListener::bind(&socket_path).map_err(|e| {
            error!("Failed to bind Unix socket at {}: {}", socket_path, e);
            e
        })?;

        info!("API server listening on Unix socket: {}", socket_path);

        let app = app.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        let app = app.clone();
                        tokio::spawn(async move {
                            let stream = hyper_util::rt::TokioIo::new(stream);
                            let hyper_service = hyper::service::service_fn(
                                move |request: hyper::Request<hyper::body::Incoming>| {
                                    app.clone().oneshot(request)
                                },
                            );

                            if let Err(err) = hyper_util::server::conn::auto::Builder::new(
                                hyper_util::rt::TokioExecutor::new(),
                            )
                            .serve_connection(stream, hyper_service)
                            .await
                            {
                                error!("Error serving Unix socket connection: {}", err);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting Unix socket connection: {}", e);
                    }
                }
            }
        });
    }

    // Start TCP API server
    let api_addr = format!("{}:{}", config.api.listen_address, config.api.port);
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .map_err(|e| {
            error!("Failed to bind API server to {}: {}", api_addr, e);
            e
        })?;

    info!("API server listening on {}", api_addr);
    info!("Swagger UI available at http://{}/swagger-ui", api_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("API server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
