//! Identity of the emitting process, captured once and handed to the
//! normalizer explicitly.

/// Environment variable carrying the deployment color tag.
pub const SERVICE_COLOR_ENV: &str = "SERVICE_COLOR";

/// Host, pid and deployment color of the emitting process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub host: String,
    pub pid: u32,
    /// Deployment/service color tag (e.g. `blue`/`green`); not injected when
    /// unset.
    pub service_color: Option<String>,
}

impl ProcessIdentity {
    /// Capture the identity of the current process.
    ///
    /// The host falls back to `HOSTNAME`, then `HOST`, then `localhost`.
    pub fn detect() -> Self {
        Self {
            host: detect_host(),
            pid: std::process::id(),
            service_color: std::env::var(SERVICE_COLOR_ENV)
                .ok()
                .filter(|c| !c.is_empty()),
        }
    }

    pub fn with_service_color(mut self, color: Option<String>) -> Self {
        self.service_color = color;
        self
    }
}

fn detect_host() -> String {
    resolve_host(
        hostname::get().ok().and_then(|h| h.into_string().ok()),
        std::env::var("HOSTNAME").ok(),
        std::env::var("HOST").ok(),
    )
}

/// First non-empty candidate, in order, else `localhost`.
fn resolve_host(
    system: Option<String>,
    hostname_env: Option<String>,
    host_env: Option<String>,
) -> String {
    [system, hostname_env, host_env]
        .into_iter()
        .flatten()
        .find(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
