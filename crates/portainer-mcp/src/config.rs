use anyhow::Context;
use clap::Args;

/// Connection flags for the MCP server. Each falls back to an environment variable.
#[derive(Debug, Clone, Default, Args)]
pub struct ServerArgs {
    /// Portainer server address, host[:port] or full URL (https assumed when no scheme)
    #[arg(long, env = "PORTAINER_SERVER")]
    pub server: Option<String>,

    /// Portainer API access token
    #[arg(long, env = "PORTAINER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only register tools that do not modify the Portainer instance
    #[arg(long, env = "PORTAINER_READ_ONLY")]
    pub read_only: bool,

    /// Skip TLS certificate verification (self-signed Portainer installs)
    #[arg(long, env = "PORTAINER_SKIP_TLS_VERIFY")]
    pub skip_tls_verify: bool,
}

/// Validated, immutable server configuration.
#[derive(Clone)]
pub struct Config {
    pub server_url: String,
    pub token: String,
    pub read_only: bool,
    pub skip_tls_verify: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("token", &"<redacted>")
            .field("read_only", &self.read_only)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .finish()
    }
}

impl Config {
    pub fn from_args(args: ServerArgs) -> anyhow::Result<Self> {
        let server_url = non_empty(args.server)
            .context("Portainer server address is required (--server or PORTAINER_SERVER)")?;
        let token = non_empty(args.token)
            .context("Portainer API token is required (--token or PORTAINER_TOKEN)")?;
        Ok(Self {
            server_url,
            token,
            read_only: args.read_only,
            skip_tls_verify: args.skip_tls_verify,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
