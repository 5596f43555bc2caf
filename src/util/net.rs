use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{event, Level};

/// Whether a TCP connection to `host:port` can be opened within `limit`.
pub async fn is_host_available(host: &str, port: u16, limit: Duration) -> bool {
    match timeout(limit, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            event!(Level::DEBUG, %host, port, error = %e, "Connection refused");
            false
        }
        Err(_) => {
            event!(Level::DEBUG, %host, port, "Connection attempt timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn open_port_is_available() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(is_host_available("127.0.0.1", port, Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn closed_port_is_unavailable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        assert!(!is_host_available("127.0.0.1", port, Duration::from_secs(2)).await);
    }
}
