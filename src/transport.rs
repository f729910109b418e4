use std::{
    io::{self, Read, Write},
    net::{TcpStream, ToSocketAddrs},
    sync::Arc,
    thread,
    time::Duration,
};

use anyhow::{anyhow, bail, Context};
use bytes::Bytes;
use hyper::{Request, Response};
use log::{debug, trace, warn};

use crate::http::{Completion, Exchange, Transport};

/// Maximum number of response headers we are able to parse.
const MAX_HEADERS: usize = 96;

/// Headers always written by transport, request copies of them are skipped.
const FIXED_HEADERS: [&str; 4] = ["host", "user-agent", "accept", "connection"];

/// Settings of [`TcpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,

    /// Value of `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            user_agent: format!("routcome/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    pub fn build() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for TransportConfig struct.
#[derive(Default, Debug)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    pub fn connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn read_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    pub fn write_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.write_timeout = Some(timeout);
        self
    }

    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Returns built TransportConfig leaving default at that place.
    pub fn finalize(&mut self) -> TransportConfig {
        std::mem::take(&mut self.config)
    }
}

/// Blocking HTTP/1.1 transport, every request runs on its own thread and
/// completion is called from there.
#[derive(Clone)]
pub struct TcpTransport {
    config: Arc<TransportConfig>,
    tls: Arc<rustls::ClientConfig>,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl TcpTransport {
    pub fn new(config: TransportConfig) -> Self {
        let mut roots = rustls::RootCertStore::empty();
        roots.add_server_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.0.iter().map(|ta| {
            rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
                ta.subject,
                ta.spki,
                ta.name_constraints,
            )
        }));

        let tls = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            config: Arc::new(config),
            tls: Arc::new(tls),
        }
    }

    /// Performs whole exchange on the current thread.
    pub fn fetch(&self, request: &Request<()>) -> Exchange {
        match self.round_trip(request) {
            Ok(response) => {
                debug!("GET {} -> {}", request.uri(), response.status());
                Exchange::completed(response)
            }
            Err(e) => {
                warn!("GET {} failed: {:#}", request.uri(), e);
                Exchange::failed(e)
            }
        }
    }

    fn round_trip(&self, request: &Request<()>) -> anyhow::Result<Response<Option<Bytes>>> {
        let uri = request.uri();
        let host = uri.host().context("request has no host")?;
        let secure = uri.scheme_str() == Some("https");
        let port = uri.port_u16().unwrap_or(if secure { 443 } else { 80 });

        // IPv6 literals come bracketed, resolver and TLS want the bare address
        let address = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        let stream = self.connect(address, port)?;
        let head = self.request_head(request, host);
        trace!("request head:\n{}", head);

        let raw = if secure {
            let name = rustls::ServerName::try_from(address)
                .map_err(|_| anyhow!("invalid server name: {}", address))?;
            let connection = rustls::ClientConnection::new(Arc::clone(&self.tls), name)?;
            let mut stream = rustls::StreamOwned::new(connection, stream);
            stream.write_all(head.as_bytes())?;
            read_all(&mut stream)?
        } else {
            let mut stream = stream;
            stream.write_all(head.as_bytes())?;
            read_all(&mut stream)?
        };

        parse_response(&raw)
    }

    fn connect(&self, host: &str, port: u16) -> anyhow::Result<TcpStream> {
        let stream = match self.config.connect_timeout {
            Some(timeout) => {
                let mut last_error = None;
                let mut connected = None;
                for addr in (host, port).to_socket_addrs()? {
                    match TcpStream::connect_timeout(&addr, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(e) => last_error = Some(e),
                    }
                }
                match (connected, last_error) {
                    (Some(stream), _) => stream,
                    (None, Some(e)) => return Err(e.into()),
                    (None, None) => bail!("{} did not resolve to any address", host),
                }
            }
            None => TcpStream::connect((host, port))?,
        };

        stream.set_read_timeout(self.config.read_timeout)?;
        stream.set_write_timeout(self.config.write_timeout)?;
        Ok(stream)
    }

    fn request_head(&self, request: &Request<()>, host: &str) -> String {
        use std::fmt::Write as _; // import without risk of name clashing

        let uri = request.uri();
        let target = match uri.query() {
            Some(query) => format!("{}?{}", uri.path(), query),
            None => uri.path().to_owned(),
        };
        let host = match uri.port_u16() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_owned(),
        };

        let mut buf = String::new();
        let _ = write!(&mut buf, "{} {} HTTP/1.1\r\n", request.method(), target);
        let _ = write!(&mut buf, "Host: {}\r\n", host);
        let _ = write!(&mut buf, "User-Agent: {}\r\n", self.config.user_agent);
        buf.push_str("Accept: */*\r\n");
        buf.push_str("Connection: close\r\n");

        for (k, v) in request.headers() {
            if FIXED_HEADERS.contains(&k.as_str()) {
                continue;
            }
            if let Ok(v) = v.to_str() {
                let _ = write!(&mut buf, "{}: {}\r\n", k, v);
            }
        }

        buf.push_str("\r\n");
        buf
    }
}

impl Transport for TcpTransport {
    fn execute(&self, request: Request<()>, completion: Completion) {
        let transport = self.clone();
        thread::spawn(move || completion(transport.fetch(&request)));
    }
}

/// Reads until the peer closes the connection. TLS peers often skip
/// close_notify, what's been read until then is kept.
fn read_all<R: Read>(reader: &mut R) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match reader.read_to_end(&mut buf) {
        Ok(_) => Ok(buf),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => Ok(buf),
        Err(e) => Err(e.into()),
    }
}

/// Parses raw HTTP/1.x response. Empty body is reported as absent.
fn parse_response(raw: &[u8]) -> anyhow::Result<Response<Option<Bytes>>> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Response::new(&mut headers);

    let offset = match parsed.parse(raw)? {
        httparse::Status::Complete(offset) => offset,
        httparse::Status::Partial => bail!("connection closed before response head was complete"),
    };

    let code = parsed.code.context("response has no status code")?;
    let mut builder = Response::builder().status(code);
    let mut chunked = false;
    let mut content_length = None;

    for header in parsed.headers.iter() {
        if header.name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = String::from_utf8_lossy(header.value)
                .to_ascii_lowercase()
                .contains("chunked");
        } else if header.name.eq_ignore_ascii_case("content-length") {
            content_length = std::str::from_utf8(header.value)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok());
        }
        builder = builder.header(header.name, header.value);
    }

    let payload = &raw[offset..];
    let body = if chunked {
        decode_chunked(payload)?
    } else if let Some(length) = content_length {
        payload
            .get(..length)
            .with_context(|| format!("expected {} body bytes, got {}", length, payload.len()))?
            .to_vec()
    } else {
        payload.to_vec()
    };

    let body = if body.is_empty() {
        None
    } else {
        Some(Bytes::from(body))
    };

    Ok(builder.body(body)?)
}

fn decode_chunked(mut payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        let (consumed, size) = match httparse::parse_chunk_size(payload)
            .map_err(|_| anyhow!("invalid chunk size"))?
        {
            httparse::Status::Complete(parsed) => parsed,
            httparse::Status::Partial => bail!("truncated chunked body"),
        };
        payload = &payload[consumed..];

        if size == 0 {
            return Ok(body);
        }

        let size = usize::try_from(size)?;
        let chunk = payload.get(..size).context("truncated chunk")?;
        body.extend_from_slice(chunk);

        // chunk data is followed by CRLF
        payload = payload.get(size + 2..).context("truncated chunk")?;
    }
}
