use crate::api::handlers::{ApiRequest, ApiResponse, ApiState};
use crate::error::{Result, TxLensError};
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);
const PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);
// Request line plus headers; bodies are never read
const MAX_HEAD_BYTES: u64 = 16 * 1024;

/// Blocking JSON API server, one thread per connection
pub struct ApiServer {
    state: Arc<ApiState>,
}

impl ApiServer {
    pub fn new(state: ApiState) -> ApiServer {
        ApiServer {
            state: Arc::new(state),
        }
    }

    /// Bind `addr` and serve until the process exits
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| TxLensError::Io(format!("Failed to bind to {addr}: {e}")))?;
        info!("API listening on http://{addr}");
        self.start_rate_limit_purge();
        self.serve(listener);
        Ok(())
    }

    /// Accept loop over an already bound listener
    pub fn serve(&self, listener: TcpListener) {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer_addr = match stream.peer_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            error!("Failed to get peer address: {e}");
                            continue;
                        }
                    };
                    let state = Arc::clone(&self.state);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(&state, stream, peer_addr) {
                            error!("Error handling connection from {peer_addr}: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }
    }

    fn start_rate_limit_purge(&self) {
        let state = Arc::clone(&self.state);
        thread::spawn(move || loop {
            thread::sleep(PURGE_INTERVAL);
            let removed = state.purge_rate_limits();
            if removed > 0 {
                debug!("Purged {removed} expired rate-limit windows");
            }
        });
    }
}

fn handle_connection(state: &ApiState, mut stream: TcpStream, peer_addr: SocketAddr) -> Result<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;

    let mut request = {
        let mut reader = BufReader::new((&stream).take(MAX_HEAD_BYTES));
        match read_request(&mut reader)? {
            Some(request) => request,
            None => return Ok(()),
        }
    };

    // Direct connections have no proxy headers: identify them by peer IP
    if request.header("x-forwarded-for").is_none() && request.header("x-real-ip").is_none() {
        request.set_header("x-real-ip", &peer_addr.ip().to_string());
    }

    let response = state.handle(&request);
    info!(
        "{} {} from {peer_addr} -> {}",
        request.method, request.path, response.status
    );
    write_response(&mut stream, &response)
}

/// Parse the request line and headers; `None` on a connection closed early
fn read_request<R: BufRead>(reader: &mut R) -> Result<Option<ApiRequest>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => (method, target),
        _ => {
            return Err(TxLensError::InvalidInput(format!(
                "Malformed request line: {:?}",
                line.trim_end()
            )))
        }
    };
    let mut request = ApiRequest::new(method, target);

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            request.set_header(name.trim(), value);
        }
    }
    Ok(Some(request))
}

fn write_response<W: Write>(writer: &mut W, response: &ApiResponse) -> Result<()> {
    let body = serde_json::to_vec(&response.body)?;

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.reason(),
        body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    writer.write_all(head.as_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}
