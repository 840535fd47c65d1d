//! Docs URL reporting.
//!
//! After startup the orchestrator logs where the hosting application's API
//! docs can be reached. This is best effort: any failure is a warning.

use std::net::{IpAddr, UdpSocket};

use thiserror::Error;

/// What the orchestrator needs from the hosting application.
pub trait ServeInfo: Send + Sync {
    /// Port the application serves on, if known.
    fn port(&self) -> Option<u16>;

    /// Path of the docs UI. Defaults to `/docs` when `None`.
    fn docs_path(&self) -> Option<String> {
        None
    }
}

pub const DEFAULT_DOCS_PATH: &str = "/docs";

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("application did not report a port")]
    MissingPort,

    #[error("could not determine network address: {0}")]
    HostLookup(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsUrls {
    pub local: String,
    pub network: String,
}

/// Address of the interface used for outbound traffic.
///
/// Connecting a UDP socket only selects a route; nothing is sent.
fn probe_local_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(("8.8.8.8", 80))?;
    Ok(socket.local_addr()?.ip())
}

/// Compose local and network docs URLs.
pub fn docs_urls(app: &dyn ServeInfo, advertise_host: Option<&str>) -> Result<DocsUrls, DocsError> {
    let port = app.port().ok_or(DocsError::MissingPort)?;
    let path = app
        .docs_path()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCS_PATH.to_string());

    let host = match advertise_host {
        Some(host) => host.to_string(),
        None => probe_local_ip()?.to_string(),
    };

    Ok(DocsUrls {
        local: format!("http://localhost:{}{}", port, path),
        network: format!("http://{}:{}{}", host, port, path),
    })
}

/// Log the docs URLs, or a warning if they cannot be determined.
pub fn report_docs_url(app: &dyn ServeInfo, advertise_host: Option<&str>) {
    match docs_urls(app, advertise_host) {
        Ok(urls) => {
            tracing::info!(url = %urls.local, "Swagger UI available at: {}", urls.local);
            tracing::info!(url = %urls.network, "Network Swagger UI available at: {}", urls.network);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to determine docs URL");
        }
    }
}
