use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{InterpretError, InterpretRequest, InterpretResult, Interpreter};
use crate::consts::{INTERPRET_PATH, SESSION_PATH};

/// An interpreter that POSTs scripts to a remote service over HTTP.
///
/// Keeps a cookie store so the session cookie handed out by
/// [`start_session`](Self::start_session) rides along on every request.
pub struct HttpInterpreter {
    client: reqwest::Client,
    base: Url,
}

impl HttpInterpreter {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(endpoint, client)
    }

    /// Use a preconfigured client. It needs a cookie store for sessions to work.
    pub fn with_client(endpoint: &str, client: reqwest::Client) -> Result<Self> {
        let base = parse_endpoint(endpoint)?;
        Ok(Self { client, base })
    }

    /// The configured base address.
    pub fn endpoint(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint(), path)
    }

    /// Ask the service for a session cookie. The service rejects
    /// interpret requests from clients without one.
    pub async fn start_session(&self) -> Result<()> {
        let url = self.url(SESSION_PATH);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("session request to {url} failed ({status})");
        }
        tracing::debug!(%url, %status, "session started");
        Ok(())
    }
}

#[async_trait]
impl Interpreter for HttpInterpreter {
    async fn interpret(&self, request: &InterpretRequest) -> Result<InterpretResult, InterpretError> {
        let url = self.url(INTERPRET_PATH);
        tracing::debug!(%url, bytes = request.input.len(), "posting interpret request");

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| InterpretError::Transport(describe(&e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| InterpretError::Transport(describe(&e)))?;

        tracing::debug!(%status, bytes = body.len(), "interpret response received");
        decode(status, &body)
    }
}

/// Parse a configured endpoint. A bare `host:port` is taken as plain HTTP.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        bail!("endpoint is empty");
    }
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    };
    let url = Url::parse(&candidate).with_context(|| format!("invalid endpoint: {endpoint}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported endpoint scheme: {}", url.scheme());
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("endpoint must not carry a query or fragment: {endpoint}");
    }
    Ok(url)
}

/// Turn a response body into a result. The status code only matters when
/// the service sends its `detail` error envelope.
fn decode(status: StatusCode, body: &str) -> Result<InterpretResult, InterpretError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| InterpretError::Decode(e.to_string()))?;

    if !status.is_success()
        && let Some(detail) = value.get("detail")
    {
        let detail = match detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(InterpretError::Server {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_value(value).map_err(|e| InterpretError::Decode(e.to_string()))
}

/// Flatten an error and its sources into one line.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_body() {
        let result = decode(StatusCode::OK, r#"{"result":"2"}"#).unwrap();
        assert_eq!(result.result, "2");
    }

    #[test]
    fn decode_keeps_result_verbatim() {
        let result = decode(StatusCode::OK, r#"{"result":"  a\n\tb  "}"#).unwrap();
        assert_eq!(result.result, "  a\n\tb  ");
    }

    #[test]
    fn decode_non_json_body_is_decode_error() {
        let err = decode(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").unwrap_err();
        assert!(matches!(err, InterpretError::Decode(_)));
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn decode_missing_result_is_decode_error() {
        let err = decode(StatusCode::OK, r#"{"output":"2"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Decode(ref m) if m.contains("result")));
    }

    #[test]
    fn decode_non_string_result_is_decode_error() {
        let err = decode(StatusCode::OK, r#"{"result":2}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Decode(_)));
    }

    #[test]
    fn decode_detail_envelope_on_failure_status() {
        let err = decode(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"Interpretation error: unexpected token"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InterpretError::Server {
                status: 500,
                detail: "Interpretation error: unexpected token".into()
            }
        );
    }

    #[test]
    fn decode_structured_detail_is_rendered_as_json() {
        let err = decode(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":[{"loc":["body"]}]}"#)
            .unwrap_err();
        assert!(matches!(err, InterpretError::Server { status: 422, ref detail } if detail.contains("loc")));
    }

    #[test]
    fn decode_detail_on_success_status_is_not_an_envelope() {
        let err = decode(StatusCode::OK, r#"{"detail":"odd"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Decode(_)));
    }

    #[test]
    fn parse_endpoint_accepts_http_and_https() {
        assert_eq!(
            parse_endpoint("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/"
        );
        assert!(parse_endpoint("https://example.com").is_ok());
    }

    #[test]
    fn parse_endpoint_defaults_bare_host_port_to_http() {
        let url = parse_endpoint("127.0.0.1:9000").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(9000));
    }

    #[test]
    fn parse_endpoint_rejects_other_schemes_and_empty() {
        assert!(parse_endpoint("ftp://example.com").is_err());
        assert!(parse_endpoint("   ").is_err());
    }

    #[test]
    fn parse_endpoint_rejects_query_and_fragment() {
        let err = parse_endpoint("http://host/?a=1").unwrap_err();
        assert!(err.to_string().contains("query or fragment"));
        assert!(parse_endpoint("http://host/api#top").is_err());
        assert!(parse_endpoint("host:8000?x").is_err());
    }

    #[test]
    fn interpret_url_joins_path() {
        let interpreter = HttpInterpreter::new("http://localhost:8000/").unwrap();
        assert_eq!(interpreter.endpoint(), "http://localhost:8000");
        assert_eq!(interpreter.url(INTERPRET_PATH), "http://localhost:8000/interpret");

        let nested = HttpInterpreter::new("http://host/api").unwrap();
        assert_eq!(nested.url(INTERPRET_PATH), "http://host/api/interpret");
    }

    #[test]
    fn describe_includes_sources() {
        #[derive(Debug)]
        struct Outer(std::io::Error);
        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "error sending request")
            }
        }
        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(describe(&err), "error sending request: connection refused");
    }
}
