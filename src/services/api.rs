use crate::model::{FormResponse, SubmissionPayload};
use std::env;
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

/// Failure taxonomy for one submission attempt. No retries at this layer;
/// the user resubmits manually.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the ticket API: {0}")]
    Connectivity(#[source] reqwest::Error),
    #[error("ticket API rejected the request (HTTP {status})")]
    HttpStatus { status: u16 },
    #[error("ticket API returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Endpoint configuration, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            version: "v1".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("TICKET_API_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        let version = env::var("TICKET_API_VERSION")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "v1".to_string());
        Self { base_url, version }
    }

    pub fn forms_endpoint(&self) -> String {
        format!(
            "{}/{}/user/forms",
            self.base_url.trim_end_matches('/'),
            self.version
        )
    }
}

/// Thin wrapper around a blocking HTTP client; one best-effort POST per call,
/// transport-default timeouts.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            config,
        }
    }

    pub fn post_form(&self, payload: &SubmissionPayload) -> Result<FormResponse, ApiError> {
        let url = self.config.forms_endpoint();
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .map_err(ApiError::Connectivity)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
            });
        }
        resp.json::<FormResponse>().map_err(ApiError::Decode)
    }
}

/// Run the submission on a worker thread and report the outcome over the
/// app's channel. The UI thread never blocks on the network.
pub fn spawn_submit(
    config: ApiConfig,
    payload: SubmissionPayload,
    tx: Sender<crate::ui::SubmitMsg>,
) {
    thread::spawn(move || {
        let client = ApiClient::new(config);
        let outcome = client.post_form(&payload);
        let _ = tx.send(crate::ui::SubmitMsg { outcome });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, TicketType};
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[test]
    fn endpoint_joins_base_version_and_resource() {
        let cfg = ApiConfig {
            base_url: "http://localhost:8000".into(),
            version: "v1".into(),
        };
        assert_eq!(cfg.forms_endpoint(), "http://localhost:8000/v1/user/forms");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let cfg = ApiConfig {
            base_url: "https://api.example.com/".into(),
            version: "v2".into(),
        };
        assert_eq!(
            cfg.forms_endpoint(),
            "https://api.example.com/v2/user/forms"
        );
    }

    #[test]
    fn http_status_error_carries_the_code() {
        let err = ApiError::HttpStatus { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    fn sample_payload() -> SubmissionPayload {
        SubmissionPayload {
            name: "Taro".into(),
            email: "taro@example.com".into(),
            number_of_seat_tickets: 2,
            number_of_goods_tickets: 1,
            payment_method: PaymentMethod::Cash,
            remarks: Some(String::new()),
            movie_id: "m1".into(),
            ticket_type: TicketType::Preorder,
            is_verified: false,
            payment_status: "pending".into(),
        }
    }

    // Minimal one-shot HTTP endpoint; answers a single request with `status`
    // and `body`, and hands back the request head + body it saw.
    fn spawn_mock_endpoint(
        status_line: &'static str,
        body: &'static str,
    ) -> (u16, std::sync::mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length: usize = head
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    if k.eq_ignore_ascii_case("content-length") {
                        v.trim().parse().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
            }
            let req_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send((head, req_body));
        });
        (port, rx)
    }

    fn client_for(port: u16) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            version: "v1".into(),
        })
    }

    #[test]
    fn submit_success_decodes_the_response_body() {
        let (port, rx) = spawn_mock_endpoint("HTTP/1.1 200 OK", r#"{"message":"ok"}"#);
        let resp = client_for(port).post_form(&sample_payload()).unwrap();
        assert_eq!(resp.message, "ok");

        let (head, body) = rx.recv().unwrap();
        let first = head.lines().next().unwrap();
        assert!(first.starts_with("POST /v1/user/forms "), "{first}");
        assert!(head
            .lines()
            .any(|l| l.to_ascii_lowercase().starts_with("content-type: application/json")));
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent, serde_json::to_value(sample_payload()).unwrap());
    }

    #[test]
    fn submit_maps_server_rejection_to_http_status() {
        let (port, _rx) = spawn_mock_endpoint(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"detail":"boom"}"#,
        );
        let err = client_for(port).post_form(&sample_payload()).unwrap_err();
        match err {
            ApiError::HttpStatus { status } => assert_eq!(status, 500),
            other => panic!("expected http status error, got {other:?}"),
        }
    }

    #[test]
    fn submit_maps_refused_connection_to_connectivity() {
        // bind then drop to get a port that refuses connections
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = client_for(port).post_form(&sample_payload()).unwrap_err();
        assert!(matches!(err, ApiError::Connectivity(_)));
    }
}
