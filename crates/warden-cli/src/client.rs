use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use warden_protocol::{Request, Response, MAX_FRAME_LENGTH};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("the daemon is not running")]
    DaemonNotRunning,
    #[error("timed out talking to the daemon")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    InputOutput(String),
}

pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

/// An open `Subscribe` connection.
pub struct EventStream {
    stream: Stream,
}

impl DaemonClient {
    pub fn new() -> Self {
        Self {
            socket_path: warden_protocol::default_socket_path(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let mut stream = self.connect().await?;
        self.write_request(&mut stream, &request).await?;

        timeout(self.timeout, read_frame(&mut stream))
            .await
            .map_err(|_| ClientError::Timeout)?
    }

    /// Opens a subscription and waits for the daemon to acknowledge it.
    pub async fn subscribe(&self) -> Result<EventStream, ClientError> {
        let mut stream = self.connect().await?;
        self.write_request(&mut stream, &Request::Subscribe).await?;

        let acknowledgment = timeout(self.timeout, read_frame(&mut stream))
            .await
            .map_err(|_| ClientError::Timeout)??;

        match acknowledgment {
            Response::Subscribed => Ok(EventStream { stream }),
            Response::Error { message } => Err(ClientError::Connection(message)),
            other => Err(ClientError::Connection(format!(
                "unexpected subscription reply: {other:?}"
            ))),
        }
    }

    async fn connect(&self) -> Result<Stream, ClientError> {
        let connect_future = Stream::connect(
            self.socket_path
                .as_os_str()
                .to_fs_name::<GenericFilePath>()
                .map_err(|error| ClientError::Connection(error.to_string()))?,
        );

        match timeout(self.timeout, connect_future).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(_)) => Err(ClientError::DaemonNotRunning),
            Err(_) => Err(ClientError::Timeout),
        }
    }

    async fn write_request(&self, stream: &mut Stream, request: &Request) -> Result<(), ClientError> {
        let request_bytes = bincode::serialize(request)
            .map_err(|error| ClientError::Serialization(error.to_string()))?;

        let request_length = (request_bytes.len() as u32).to_le_bytes();

        let write_future = async {
            stream.write_all(&request_length).await?;
            stream.write_all(&request_bytes).await?;
            stream.flush().await?;
            Ok::<_, std::io::Error>(())
        };

        timeout(self.timeout, write_future)
            .await
            .map_err(|_| ClientError::Timeout)?
            .map_err(|error| ClientError::InputOutput(error.to_string()))
    }
}

impl Default for DaemonClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStream {
    /// Waits for the next event frame. `None` once the daemon closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<Response>, ClientError> {
        match read_frame(&mut self.stream).await {
            Ok(response) => Ok(Some(response)),
            Err(ClientError::InputOutput(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }
}

async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Response, ClientError> {
    let mut length_buffer = [0u8; 4];
    reader
        .read_exact(&mut length_buffer)
        .await
        .map_err(|error| ClientError::InputOutput(error.to_string()))?;
    let length = u32::from_le_bytes(length_buffer) as usize;

    if length > MAX_FRAME_LENGTH {
        return Err(ClientError::Serialization(format!(
            "response frame of {length} bytes exceeds the limit"
        )));
    }

    let mut payload = vec![0u8; length];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|error| ClientError::InputOutput(error.to_string()))?;

    bincode::deserialize(&payload).map_err(|error| ClientError::Serialization(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use interprocess::local_socket::{tokio::Listener, ListenerOptions};
    use std::fs;

    fn test_socket_path(name: &str) -> PathBuf {
        PathBuf::from(format!(
            "/tmp/warden-test-{}-{}.sock",
            name,
            std::process::id()
        ))
    }

    fn cleanup_socket(path: &PathBuf) {
        let _ = fs::remove_file(path);
    }

    fn listen(path: &PathBuf) -> Listener {
        ListenerOptions::new()
            .name(path.as_os_str().to_fs_name::<GenericFilePath>().unwrap())
            .create_tokio()
            .unwrap()
    }

    async fn read_request(stream: &mut Stream) -> Request {
        let mut length_buffer = [0u8; 4];
        stream.read_exact(&mut length_buffer).await.unwrap();
        let mut payload = vec![0u8; u32::from_le_bytes(length_buffer) as usize];
        stream.read_exact(&mut payload).await.unwrap();
        bincode::deserialize(&payload).unwrap()
    }

    async fn write_response(stream: &mut Stream, response: &Response) {
        let bytes = bincode::serialize(response).unwrap();
        stream
            .write_all(&(bytes.len() as u32).to_le_bytes())
            .await
            .unwrap();
        stream.write_all(&bytes).await.unwrap();
        stream.flush().await.unwrap();
    }

    fn client_for(path: &PathBuf) -> DaemonClient {
        let mut client = DaemonClient::new();
        client.socket_path = path.clone();
        client
    }

    #[test]
    fn client_creates_with_default_timeout() {
        let client = DaemonClient::new();
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn client_with_custom_timeout() {
        let client = DaemonClient::new().with_timeout(Duration::from_secs(10));
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn send_returns_error_when_daemon_not_running() {
        let client = client_for(&PathBuf::from("/tmp/warden-nonexistent-socket-12345.sock"));

        let result = client.send(Request::Ping).await;

        assert!(
            matches!(result, Err(ClientError::DaemonNotRunning)),
            "expected DaemonNotRunning, got {:?}",
            result
        );
    }

    #[tokio::test]
    async fn send_ping_receives_pong() {
        let socket_path = test_socket_path("ping");
        cleanup_socket(&socket_path);
        let listener = listen(&socket_path);

        let server_handle = tokio::spawn(async move {
            let mut stream = listener.accept().await.unwrap();
            assert_eq!(read_request(&mut stream).await, Request::Ping);
            write_response(&mut stream, &Response::Pong).await;
        });

        let result = client_for(&socket_path).send(Request::Ping).await;

        assert!(matches!(result, Ok(Response::Pong)));

        server_handle.await.unwrap();
        cleanup_socket(&socket_path);
    }

    #[tokio::test]
    async fn set_blocked_apps_carries_packages() {
        let socket_path = test_socket_path("block");
        cleanup_socket(&socket_path);
        let listener = listen(&socket_path);

        let server_handle = tokio::spawn(async move {
            let mut stream = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            assert_eq!(
                request,
                Request::SetBlockedApps {
                    packages: Some(vec!["com.evil.app".to_string()])
                }
            );
            write_response(&mut stream, &Response::Ok).await;
        });

        let result = client_for(&socket_path)
            .send(Request::SetBlockedApps {
                packages: Some(vec!["com.evil.app".to_string()]),
            })
            .await;

        assert!(matches!(result, Ok(Response::Ok)));

        server_handle.await.unwrap();
        cleanup_socket(&socket_path);
    }

    #[tokio::test]
    async fn subscription_yields_events_until_daemon_closes() {
        let socket_path = test_socket_path("subscribe");
        cleanup_socket(&socket_path);
        let listener = listen(&socket_path);

        let server_handle = tokio::spawn(async move {
            let mut stream = listener.accept().await.unwrap();
            assert_eq!(read_request(&mut stream).await, Request::Subscribe);
            write_response(&mut stream, &Response::Subscribed).await;
            write_response(
                &mut stream,
                &Response::AppBlocked {
                    package: "com.evil.app".to_string(),
                    timestamp: 42,
                },
            )
            .await;
        });

        let mut events = client_for(&socket_path).subscribe().await.unwrap();

        let event = events.next_event().await.unwrap();
        assert_eq!(
            event,
            Some(Response::AppBlocked {
                package: "com.evil.app".to_string(),
                timestamp: 42,
            })
        );

        server_handle.await.unwrap();
        assert_eq!(events.next_event().await.unwrap(), None);

        cleanup_socket(&socket_path);
    }
}
