#![allow(dead_code)]
use bytes::Bytes;
use routcome::{HttpFailure, Outcome};
use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::mpsc::{channel, Receiver},
    thread,
    time::Duration,
};

pub type HttpOutcome = Outcome<Bytes, HttpFailure>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Handler forwarding every outcome into a channel, together with
/// the receiving end.
pub fn capture() -> (
    impl Fn(HttpOutcome) + Send + Sync + 'static,
    Receiver<HttpOutcome>,
) {
    let (sender, receiver) = channel();
    let sender = std::sync::Mutex::new(sender);
    let handler = move |outcome: HttpOutcome| {
        if let Ok(sender) = sender.lock() {
            let _ = sender.send(outcome);
        }
    };
    (handler, receiver)
}

/// Waits for the next outcome delivered to a captured handler.
pub fn next(receiver: &Receiver<HttpOutcome>) -> HttpOutcome {
    receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("handler was not called in time")
}

/// Serves single connection on a random local port with given raw response.
/// Returns base url of the server and receiver of the raw request.
pub fn serve_once(response: &'static [u8]) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    serve_once_on(listener, response)
}

/// Same as [`serve_once`] on an already bound listener.
pub fn serve_once_on(listener: TcpListener, response: &'static [u8]) -> (String, Receiver<String>) {
    let addr = listener.local_addr().expect("no local address");
    let (sender, receiver) = channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("failed to accept");
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.ends_with(b"\r\n\r\n") {
            let read = stream.read(&mut buf).expect("failed to read request");
            if read == 0 {
                break;
            }
            received.extend_from_slice(&buf[..read]);
        }
        let _ = sender.send(String::from_utf8_lossy(&received).into_owned());
        stream.write_all(response).expect("failed to write response");
    });

    (format!("http://{}", addr), receiver)
}
