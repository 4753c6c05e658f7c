mod edge_stack;
mod stack;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Construction-time options for [`PortainerClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Accept any TLS certificate from the server. Not for production use.
    pub skip_tls_verify: bool,
}

/// Shared HTTP plumbing: base URL, API key and the pooled reqwest client.
#[derive(Debug, Clone)]
struct Transport {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl Transport {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        tracing::debug!(%method, %url, "portainer request");
        self.http
            .request(method, url)
            .header("X-API-Key", &self.token)
    }

    /// Send the request and turn any non-success status into [`Error::Api`].
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = api_error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and decode a JSON body. `None` when the backend answered with no
    /// content or a literal `null`.
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>> {
        let bytes = self.send(req).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice::<Option<T>>(&bytes)?)
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await.map(|_| ())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    details: String,
}

fn api_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(e) if e.details.is_empty() || e.details == e.message => Some(e.message),
        Ok(e) => Some(format!("{}: {}", e.message, e.details)),
        Err(_) => Some(body.to_string()),
    }
}

fn normalize_server_url(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{server}")
    }
}

/// Client for the Portainer REST API.
///
/// Regular and edge stacks are reached through separate sub-service handles.
/// A handle that was never configured makes every call through it fail with
/// [`Error::NotInitialized`] before any network traffic.
#[derive(Debug, Clone, Default)]
pub struct PortainerClient {
    stacks: Option<Transport>,
    edge_stacks: Option<Transport>,
}

impl PortainerClient {
    /// Build a client for `server` (host[:port] or full URL) authenticating
    /// with the API key `token`. A bare host is reached over https.
    pub fn new(server: &str, token: &str, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.skip_tls_verify)
            .build()?;
        let transport = Transport {
            http,
            base_url: normalize_server_url(server),
            token: token.to_string(),
        };
        Ok(Self {
            stacks: Some(transport.clone()),
            edge_stacks: Some(transport),
        })
    }

    /// A client with no sub-services configured.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    fn stacks_svc(&self) -> Result<&Transport> {
        self.stacks.as_ref().ok_or(Error::NotInitialized("stacks"))
    }

    fn edge_stacks_svc(&self) -> Result<&Transport> {
        self.edge_stacks
            .as_ref()
            .ok_or(Error::NotInitialized("edge stacks"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_defaults_to_https() {
        assert_eq!(
            normalize_server_url("portainer.local:9443"),
            "https://portainer.local:9443"
        );
        assert_eq!(
            normalize_server_url("http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn api_error_message_prefers_backend_json() {
        assert_eq!(
            api_error_message(
                r#"{"message":"Unable to find a stack","details":"object not found"}"#
            ),
            Some("Unable to find a stack: object not found".to_string())
        );
        assert_eq!(
            api_error_message(r#"{"message":"Forbidden"}"#),
            Some("Forbidden".to_string())
        );
        assert_eq!(api_error_message("bad gateway"), Some("bad gateway".to_string()));
        assert_eq!(api_error_message("  "), None);
    }
}
