//! OCM connection and the service log endpoint

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::OcmError;
use crate::template::ServiceLogTemplate;

/// Path of the cluster service log collection
const CLUSTER_LOGS_PATH: &str = "/api/service_logs/v1/cluster_logs";

/// Authenticated session against one OCM environment
///
/// Each delivery establishes its own connection; dropping it releases the
/// underlying HTTP client.
#[derive(Debug)]
pub struct OcmConnection {
    base_url: Url,
    token: String,
    http: Client,
}

/// Error body returned by OCM APIs
#[derive(Debug, Deserialize)]
struct OcmErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl OcmConnection {
    /// Validate the URL and token and build the HTTP client
    pub fn establish(url: &str, token: &str, timeout: Duration) -> Result<Self, OcmError> {
        debug!(%url, ?timeout, "establish: called");
        let base_url = Url::parse(url).map_err(|e| OcmError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(OcmError::InvalidUrl {
                url: url.to_string(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(OcmError::MissingToken);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("servicelogger/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            token: token.to_string(),
            http,
        })
    }

    /// Post a service log for one cluster
    pub async fn post_service_log(&self, cluster_id: &str, template: &ServiceLogTemplate) -> Result<(), OcmError> {
        debug!(%cluster_id, summary = %template.summary, "post_service_log: called");
        let url = self.endpoint();
        let body = build_log_entry(cluster_id, template)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%cluster_id, %status, "post_service_log: accepted");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text).unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.trim().to_string()
            }
        });
        warn!(%cluster_id, status = status.as_u16(), %message, "post_service_log: rejected");

        Err(OcmError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), CLUSTER_LOGS_PATH)
    }
}

/// Build the JSON log entry for one cluster
fn build_log_entry(cluster_id: &str, template: &ServiceLogTemplate) -> Result<serde_json::Value, OcmError> {
    let mut body = serde_json::to_value(template)?;
    body["cluster_id"] = serde_json::json!(cluster_id);
    Ok(body)
}

/// Extract a readable message from an OCM error body
fn error_message(text: &str) -> Option<String> {
    let body: OcmErrorBody = serde_json::from_str(text).ok()?;
    match (body.reason, body.code) {
        (Some(reason), _) if !reason.is_empty() => Some(reason),
        (_, Some(code)) if !code.is_empty() => Some(code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn template() -> ServiceLogTemplate {
        ServiceLogTemplate::from_json(br#"{"summary": "Heads up", "description": "Maintenance tonight"}"#).unwrap()
    }

    /// Accept one HTTP request, answer with `status` and `body`, return the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_establish_rejects_bad_url() {
        let err = OcmConnection::establish("not a url", "token", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, OcmError::InvalidUrl { .. }));

        let err = OcmConnection::establish("ftp://api.example.com", "token", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, OcmError::InvalidUrl { .. }));
    }

    #[test]
    fn test_establish_rejects_empty_token() {
        let err = OcmConnection::establish("https://api.openshift.com", "  ", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, OcmError::MissingToken));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let conn = OcmConnection::establish("https://api.openshift.com/", "token", Duration::from_secs(5)).unwrap();
        assert_eq!(
            conn.endpoint(),
            "https://api.openshift.com/api/service_logs/v1/cluster_logs"
        );
    }

    #[test]
    fn test_build_log_entry() {
        let body = build_log_entry("abc123", &template()).unwrap();
        assert_eq!(body["cluster_id"], "abc123");
        assert_eq!(body["summary"], "Heads up");
        assert_eq!(body["severity"], "Info");
        assert!(body.get("doc_references").is_none());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"kind":"Error","code":"CLUSTERS-MGMT-404","reason":"Cluster not found"}"#),
            Some("Cluster not found".to_string())
        );
        assert_eq!(
            error_message(r#"{"kind":"Error","code":"OCM-403"}"#),
            Some("OCM-403".to_string())
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[tokio::test]
    async fn test_post_service_log_success() {
        let (url, server) = serve_once("201 Created", "{}").await;
        let conn = OcmConnection::establish(&url, "secret-token", Duration::from_secs(5)).unwrap();

        conn.post_service_log("cluster-1", &template()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/service_logs/v1/cluster_logs "));
        assert!(request.to_lowercase().contains("authorization: bearer secret-token"));
        assert!(request.contains(r#""cluster_id":"cluster-1""#));
    }

    #[tokio::test]
    async fn test_post_service_log_api_error() {
        let (url, server) = serve_once(
            "404 Not Found",
            r#"{"kind":"Error","code":"OCM-404","reason":"Cluster 'nope' not found"}"#,
        )
        .await;
        let conn = OcmConnection::establish(&url, "secret-token", Duration::from_secs(5)).unwrap();

        let err = conn.post_service_log("nope", &template()).await.unwrap_err();
        server.await.unwrap();

        match err {
            OcmError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Cluster 'nope' not found");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_service_log_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let conn = OcmConnection::establish(&url, "secret-token", Duration::from_secs(5)).unwrap();
        let err = conn.post_service_log("cluster-1", &template()).await.unwrap_err();
        assert!(matches!(err, OcmError::Network(_)));
    }
}
