use hyper::Request;
use log::debug;

use crate::http::Exchange;

/// Lets `Box<dyn Middleware>` be cloned together with the client. Blanket
/// implemented for every `Middleware + Clone`, since requiring `Clone` on
/// `Middleware` itself would make it not object safe.
pub trait MiddlewareClone {
    fn clone_box(&self) -> Box<dyn Middleware>;
}

impl<T> MiddlewareClone for T
where
    T: 'static + Middleware + Clone,
{
    fn clone_box(&self) -> Box<dyn Middleware> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Middleware> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub trait Middleware: MiddlewareClone + Send + Sync {
    /// Runs on every request before it's handed to transport. Returning an
    /// error stops the request, handler receives `MalformedRequest`.
    fn on_request(&self, _req: &mut Request<()>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs on every exchange before it's turned into handler's outcome.
    fn on_exchange(&self, _exchange: &mut Exchange) {}
}

#[derive(Debug, Clone, Copy)]
pub struct LogMiddleware {}

impl Middleware for LogMiddleware {
    fn on_request(&self, req: &mut Request<()>) -> anyhow::Result<()> {
        debug!("LogMiddleware::on_request - request: {:?}", req);
        Ok(())
    }

    fn on_exchange(&self, exchange: &mut Exchange) {
        debug!(
            "LogMiddleware::on_exchange - status: {:?}, error: {:?}",
            exchange.response.as_ref().map(|r| r.status()),
            exchange.error
        );
    }
}
