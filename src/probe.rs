use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Returns whether something accepts TCP connections on `host:port`.
pub async fn server_reachable(host: &str, port: u16, wait: Duration) -> bool {
    match timeout(wait, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::debug!("Connection to {}:{} refused: {}", host, port, e);
            false
        }
        Err(_) => {
            log::debug!("Connection to {}:{} timed out after {:?}", host, port, wait);
            false
        }
    }
}
