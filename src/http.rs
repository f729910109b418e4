use std::{ops::Range, sync::Arc};

use anyhow::Context;
use bytes::Bytes;
use hyper::{Request, Response, Uri};
use log::debug;

use crate::{middleware::Middleware, outcome::Outcome, transport::TcpTransport};

/// Status codes treated as successful.
const SUCCESS_RANGE: Range<u16> = 200..300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpFailure {
    #[error("*** Request Failed ***\n{0}")]
    RequestFailed(String),

    #[error("*** Malformed Request ***\n{0}")]
    MalformedRequest(String),
}

impl HttpFailure {
    /// Human readable description of the failure.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Everything transport observed for a single request: a response, an
/// error, both or none.
#[derive(Debug, Default)]
pub struct Exchange {
    pub response: Option<Response<Option<Bytes>>>,
    pub error: Option<anyhow::Error>,
}

impl Exchange {
    pub fn completed(response: Response<Option<Bytes>>) -> Self {
        Self {
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: anyhow::Error) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Succeeds only when there was no transport error and status is 2xx.
    /// Missing body is reported as empty payload.
    pub fn into_outcome(self) -> Outcome<Bytes, HttpFailure> {
        let status = self.response.as_ref().map(|r| r.status().as_u16());
        let successful = status.map_or(false, |code| SUCCESS_RANGE.contains(&code));

        if successful && self.error.is_none() {
            let body = self.response.and_then(|r| r.into_body());
            return Outcome::Success(body.unwrap_or_default());
        }

        let mut lines = vec![match status {
            Some(code) => format!("-> STATUS {}", code),
            None => "-> NO STATUS".to_string(),
        }];
        if let Some(error) = self.error {
            lines.push(format!("-> {:#}", error));
        }

        Outcome::Failure(HttpFailure::RequestFailed(lines.join("\n")))
    }
}

/// Callback handed to transport, must be called exactly once.
pub type Completion = Box<dyn FnOnce(Exchange) + Send + 'static>;

/// Performs network I/O for a single request.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request<()>, completion: Completion);
}

/// Client issuing GET requests and reporting results through handlers.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,

    /// Registered middlewares, run in registration order.
    middlewares: Vec<Box<dyn Middleware>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates client backed by [`TcpTransport`] with default configuration.
    pub fn new() -> Self {
        Self::with_transport(TcpTransport::default())
    }

    pub fn with_transport<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
            middlewares: Vec::new(),
        }
    }

    /// Registers new middleware.
    pub fn middleware<M>(mut self, m: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Box::new(m));
        self
    }

    /// Returns trigger that issues one GET request every time it's called.
    ///
    /// `handler` is called exactly once per trigger call. If `url` can't be
    /// turned into a request it's called right away, on the calling thread,
    /// otherwise on whatever thread transport completes on.
    ///
    /// ```rust,no_run
    /// use routcome::http::HttpClient;
    ///
    /// let fetch = HttpClient::new().get("http://example.com/persons.json", |result| {
    ///     result.on_failure(|e| eprintln!("{}", e.message()));
    /// });
    /// fetch();
    /// ```
    pub fn get<U, H>(&self, url: U, handler: H) -> impl Fn() + Send + Sync
    where
        U: Into<String>,
        H: Fn(Outcome<Bytes, HttpFailure>) + Send + Sync + 'static,
    {
        let client = self.clone();
        let url = url.into();
        let handler = Arc::new(handler);

        move || client.dispatch(&url, Arc::clone(&handler))
    }

    fn dispatch<H>(&self, url: &str, handler: Arc<H>)
    where
        H: Fn(Outcome<Bytes, HttpFailure>) + Send + Sync + 'static,
    {
        let request = match self.prepare(url) {
            Ok(request) => request,
            Err(e) => {
                debug!("refusing to send GET {}: {:#}", url, e);
                return handler(Outcome::Failure(HttpFailure::MalformedRequest(
                    url.to_owned(),
                )));
            }
        };

        debug!("GET {}", request.uri());

        let middlewares = self.middlewares.clone();
        self.transport.execute(
            request,
            Box::new(move |mut exchange: Exchange| {
                for m in &middlewares {
                    m.on_exchange(&mut exchange);
                }
                handler(exchange.into_outcome())
            }),
        );
    }

    fn prepare(&self, url: &str) -> anyhow::Result<Request<()>> {
        let mut request = build_request(url)?;
        for m in &self.middlewares {
            m.on_request(&mut request)?;
        }
        Ok(request)
    }
}

/// Builds GET request, url needs http(s) scheme and a host.
pub fn build_request(url: &str) -> anyhow::Result<Request<()>> {
    let uri: Uri = url
        .parse()
        .with_context(|| format!("invalid uri: {:?}", url))?;

    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        other => anyhow::bail!("unsupported scheme: {:?}", other),
    }
    uri.host().context("uri has no host")?;

    Ok(Request::get(uri).body(())?)
}

/// Issues GET using [`HttpClient::new`], see [`HttpClient::get`].
pub fn get<U, H>(url: U, handler: H) -> impl Fn() + Send + Sync
where
    U: Into<String>,
    H: Fn(Outcome<Bytes, HttpFailure>) + Send + Sync + 'static,
{
    HttpClient::new().get(url, handler)
}

#[cfg(test)]
mod tests {
    use super::{build_request, Exchange, HttpFailure};
    use crate::outcome::Outcome;
    use bytes::Bytes;
    use hyper::Response;

    #[test]
    fn test_build_request() {
        let request = build_request("https://example.com/persons?page=2").expect("valid request");
        assert_eq!(request.method(), hyper::Method::GET);
        assert_eq!(request.uri().host(), Some("example.com"));

        assert!(build_request("").is_err());
        assert!(build_request("not a url").is_err());
        assert!(build_request("/relative/path").is_err());
        assert!(build_request("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_missing_body_is_empty_payload() {
        let response = Response::builder().status(204).body(None).unwrap();
        assert_eq!(
            Exchange::completed(response).into_outcome(),
            Outcome::Success(Bytes::new())
        );
    }

    #[test]
    fn test_transport_error_wins_over_status() {
        let exchange = Exchange {
            response: Some(Response::builder().status(200).body(None).unwrap()),
            error: Some(anyhow::anyhow!("connection reset")),
        };

        assert_eq!(
            exchange.into_outcome(),
            Outcome::Failure(HttpFailure::RequestFailed(
                "-> STATUS 200\n-> connection reset".into()
            ))
        );
    }

    #[test]
    fn test_no_response() {
        let outcome = Exchange::failed(anyhow::anyhow!("connection refused")).into_outcome();
        assert_eq!(
            outcome,
            Outcome::Failure(HttpFailure::RequestFailed(
                "-> NO STATUS\n-> connection refused".into()
            ))
        );
    }
}
