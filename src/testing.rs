use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use bytes::Bytes;
use hyper::{Request, Response};

use crate::http::{Completion, Exchange, Transport};

/// Transport answering every request synchronously, on the caller's thread,
/// with a canned exchange. Used to simulate server responses.
#[derive(Clone)]
pub struct StubTransport {
    reply: Arc<dyn Fn(&Request<()>) -> Exchange + Send + Sync>,
    requests: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl StubTransport {
    pub fn new<R>(reply: R) -> Self
    where
        R: Fn(&Request<()>) -> Exchange + Send + Sync + 'static,
    {
        Self {
            reply: Arc::new(reply),
            requests: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Replies with given status and body to every request.
    pub fn respond(status: u16, body: &'static str) -> Self {
        Self::new(move |_| {
            let body = (!body.is_empty()).then(|| Bytes::from_static(body.as_bytes()));
            match Response::builder().status(status).body(body) {
                Ok(response) => Exchange::completed(response),
                Err(e) => Exchange::failed(e.into()),
            }
        })
    }

    /// Replies with transport error and no response to every request.
    pub fn fail(message: &'static str) -> Self {
        Self::new(move |_| Exchange::failed(anyhow::anyhow!(message)))
    }

    /// Number of requests that reached the transport.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Uris of requests that reached the transport, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: Request<()>, completion: Completion) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.uri().to_string());
        }
        completion((self.reply)(&request))
    }
}
