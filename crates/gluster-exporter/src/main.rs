mod handlers;
mod middleware;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::any;
use clap::Parser;
use clap::builder::BoolishValueParser;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use gluster_exporter_core::cli::SystemRunner;
use gluster_exporter_core::mount::RealFs;
use gluster_exporter_core::{
    BuildInfoCollector, CollectorConfig, GlusterCollector, Registry, VolumeScope,
};

use middleware::AccessLogLayer;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(
    name = "gluster-exporter",
    about = "Prometheus exporter for GlusterFS",
    version = gluster_exporter_core::VERSION
)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:9189", env = "PROM_HOSTNAME")]
    listen: String,

    /// Comma-separated list of volumes to export, or "_all".
    #[arg(long, default_value = "_all", env = "PROM_VOLUMES")]
    volumes: String,

    /// Export per-brick profile statistics (requires `volume profile start`).
    #[arg(
        long,
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        env = "PROM_PROFILE"
    )]
    profile: bool,

    /// Export quota limits of in-scope volumes.
    #[arg(
        long,
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        env = "PROM_QUOTA"
    )]
    quota: bool,

    /// Path to the gluster executable.
    #[arg(long, default_value = "gluster", env = "GLUSTER_PATH")]
    gluster_path: String,

    /// Host name bricks of this node are prefixed with. Defaults to the
    /// output of `hostname`.
    #[arg(long, env = "GLUSTER_HOSTNAME")]
    hostname: Option<String>,

    /// Deadline for a single gluster or mount invocation, in seconds.
    #[arg(long, default_value = "30", env = "GLUSTER_COMMAND_TIMEOUT")]
    command_timeout: u64,

    /// HTTP path metrics are served on.
    #[arg(long, default_value = "/api/v1/metrics", env = "PROM_METRICS_PATH")]
    metrics_path: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if args.gluster_path.trim().is_empty() {
        error!("--gluster-path must not be empty");
        process::exit(2);
    }
    if !args.metrics_path.starts_with('/') {
        error!(path = %args.metrics_path, "--metrics-path must start with '/'");
        process::exit(2);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    let hostname = resolve_hostname(args.hostname.clone(), get_hostname);
    if args.volumes.split(',').all(|v| v.trim().is_empty()) {
        warn!(volumes = %args.volumes, "no volumes given, exporting all volumes");
    }
    let config = CollectorConfig {
        scope: VolumeScope::parse(&args.volumes),
        profile: args.profile,
        quota: args.quota,
        hostname,
    };
    info!(
        version = gluster_exporter_core::VERSION,
        revision = gluster_exporter_core::GIT_SHA,
        scope = ?config.scope,
        profile = config.profile,
        quota = config.quota,
        hostname = %config.hostname,
        "starting"
    );

    let runner = SystemRunner::new(Duration::from_secs(args.command_timeout));
    let mut registry = Registry::new();
    let registered = registry
        .register(Box::new(GlusterCollector::new(
            runner,
            RealFs::new(),
            args.gluster_path.clone(),
            config,
        )))
        .and_then(|()| registry.register(Box::new(BuildInfoCollector::default())));
    if let Err(e) = registered {
        error!(error = %e, "failed to register collectors");
        process::exit(1);
    }

    let app = router(Arc::new(registry), &args.metrics_path)
        .into_make_service_with_connect_info::<SocketAddr>();

    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(2);
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, path = %args.metrics_path, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        process::exit(1);
    }
}

/// Metrics on `metrics_path`, JSON 404 everywhere else. Every response
/// carries CORS headers and `Cache-Control: no-cache`.
pub(crate) fn router(registry: Arc<Registry>, metrics_path: &str) -> Router {
    Router::new()
        .route(metrics_path, any(handlers::handle_metrics))
        .fallback(handlers::route_not_found)
        .with_state(registry)
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(AccessLogLayer)
}

/// Initializes the tracing subscriber. Default level is INFO.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = ["gluster_exporter", "gluster_exporter_core"]
        .iter()
        .filter_map(|target| format!("{target}={level}").parse().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Host name bricks of this node are prefixed with: the configured one, or
/// `lookup()` when none is given. Warns when it ends up empty.
fn resolve_hostname(configured: Option<String>, lookup: impl FnOnce() -> String) -> String {
    let hostname = configured.unwrap_or_else(lookup).trim().to_string();
    if hostname.is_empty() {
        warn!("cannot determine the host name, no brick will be attributed to this node; set --hostname");
    }
    hostname
}

/// Get machine hostname via the `hostname` command.
fn get_hostname() -> String {
    process::Command::new("hostname")
        .output()
        .ok()
        .and_then(|out| {
            if out.status.success() {
                String::from_utf8(out.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_default()
}
