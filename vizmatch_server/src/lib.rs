use ctrlc::set_handler;
use tracing_subscriber::EnvFilter;

pub mod client;
pub mod models;
pub mod routes;
mod utils;

type BindingAddress = String;

/// One-time process setup: logging, signal handling, and configuration.
/// All configuration comes from environment variables so the upstream
/// endpoint's location never lives in the caller's trust boundary.
pub fn init() -> Result<(BindingAddress, models::state::MatcherState), Box<dyn std::error::Error>>
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    // The upstream match endpoint is required; the binding address falls
    // back to all interfaces on the usual relay port.
    let upstream_url = dotenvy::var("VIZMATCH_UPSTREAM_URL")?;
    let bind_addr = dotenvy::var("VIZMATCH_BIND_ADDR")
        .unwrap_or_else(|_| utils::default_server_binding_addr());

    let upstream_client = client::UpstreamClient::new(upstream_url);
    let state = models::state::MatcherState { upstream_client };
    Ok((bind_addr, state))
}
