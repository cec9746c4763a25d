//! Transport abstraction and the default HTTP implementation

use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::queue::CommandQueue;

/// HTTP method of an orchestration API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// The method name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One HTTP exchange against the orchestration API
///
/// The resource tree composes URIs and delegates every exchange here, so
/// swapping in a different HTTP stack (or a recording double in tests)
/// means implementing this one method. Implementations must behave as a
/// pure function of the three arguments. `send` returns a boxed future,
/// which lets an implementation claim resources (such as a queue slot)
/// before the future is first polled.
pub trait Transport: Send + Sync {
    /// Perform one request and return the decoded JSON response body
    fn send<'a>(
        &'a self,
        method: Method,
        uri: &'a str,
        body: Option<Value>,
    ) -> BoxFuture<'a, Result<Value>>;
}

/// Default transport over a shared [`reqwest::Client`]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with its own connection pool
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        method: Method,
        uri: &'a str,
        body: Option<Value>,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            debug!("{} {}", method, uri);

            let mut request = self.client.request(method.into(), uri);
            if let Some(body) = &body {
                request = request.json(body);
            }
            let response = request.send().await?.error_for_status()?;

            // DELETE and some command responses come back with no body.
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&bytes)?)
        })
    }
}

/// Transport decorator funneling every request through a command queue
///
/// This is how CRUD calls share ordering with lifecycle commands: the
/// conductor wraps its transport in one of these, so a request issued
/// right after `start()` cannot race ahead of the startup command. The
/// queue slot is claimed when `send` is called, not when the returned
/// future is first polled, so polling order cannot reorder requests.
#[derive(Clone)]
pub struct QueuedTransport {
    queue: Arc<CommandQueue>,
    inner: Arc<dyn Transport>,
}

impl QueuedTransport {
    /// Wrap `inner` so its calls execute in `queue` order
    pub fn new(queue: Arc<CommandQueue>, inner: Arc<dyn Transport>) -> Self {
        Self { queue, inner }
    }
}

impl Transport for QueuedTransport {
    fn send<'a>(
        &'a self,
        method: Method,
        uri: &'a str,
        body: Option<Value>,
    ) -> BoxFuture<'a, Result<Value>> {
        let inner = Arc::clone(&self.inner);
        let uri = uri.to_owned();
        Box::pin(
            self.queue
                .run(move || async move { inner.send(method, &uri, body).await }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::sync::Mutex;

    #[test]
    fn test_method_spelling() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_method_converts_to_reqwest() {
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
    }

    /// Transport double appending `"{method} {uri}"` to a shared log
    #[derive(Clone, Default)]
    struct OrderLog {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for OrderLog {
        fn send<'a>(
            &'a self,
            method: Method,
            uri: &'a str,
            _body: Option<Value>,
        ) -> BoxFuture<'a, Result<Value>> {
            Box::pin(async move {
                self.entries.lock().unwrap().push(format!("{method} {uri}"));
                Ok(Value::Null)
            })
        }
    }

    #[smol_potat::test]
    async fn test_send_claims_its_queue_slot_when_called() {
        let log = OrderLog::default();
        let queued = QueuedTransport::new(
            Arc::new(CommandQueue::new()),
            Arc::new(log.clone()),
        );

        let first = queued.send(Method::Get, "http://host/v1/a", None);
        let second = queued.send(Method::Get, "http://host/v1/b", None);

        // Polling in reverse order must not reorder the claimed slots.
        let (second_result, first_result) = futures::join!(second, first);
        first_result.unwrap();
        second_result.unwrap();

        assert_eq!(
            *log.entries.lock().unwrap(),
            ["GET http://host/v1/a", "GET http://host/v1/b"]
        );
    }

    /// Minimal single-connection HTTP responder for exercising the real
    /// reqwest transport. Serves one canned response per connection.
    fn serve_responses(
        listener: std::net::TcpListener,
        responses: &'static [&'static str],
    ) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 1024];
                let mut request = Vec::new();
                loop {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                stream.write_all(response.as_bytes()).unwrap();
            }
        })
    }

    // reqwest runs on the tokio reactor, so this test drives its own
    // current-thread runtime instead of smol.
    #[test]
    fn test_http_transport_decodes_json_and_rejects_non_2xx() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_responses(
            listener,
            &[
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"ok\":1}",
                "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
                "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            ],
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let transport = HttpTransport::new();

            let value = transport
                .send(Method::Get, &format!("http://{addr}/"), None)
                .await
                .unwrap();
            assert_eq!(value, json!({"ok": 1}));

            // An empty body (204 from DELETE) decodes as Null.
            let value = transport
                .send(Method::Delete, &format!("http://{addr}/gone"), None)
                .await
                .unwrap();
            assert_eq!(value, Value::Null);

            let err = transport
                .send(Method::Get, &format!("http://{addr}/boom"), None)
                .await
                .unwrap_err();
            match err {
                Error::Http(e) => assert!(e.is_status(), "expected status error: {e}"),
                other => panic!("unexpected error: {other}"),
            }
        });

        server.join().unwrap();
    }
}
