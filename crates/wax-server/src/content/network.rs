use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::debug;
use wax_common::{MainLoopHandle, Result, WaxError};
use wax_config::ContentSource;

use super::ContentResolver;

/// Reads packaged content through HTTP-style retrieval.
///
/// Requests are issued from the main loop (the platform's asset URLs are
/// only valid there) and driven on `runtime`; the calling task waits on
/// the result without blocking its worker.
pub struct NetworkResolver {
    base_url: String,
    http: reqwest::Client,
    main_loop: MainLoopHandle,
    runtime: Handle,
}

impl NetworkResolver {
    pub fn new(base_url: impl Into<String>, main_loop: MainLoopHandle, runtime: Handle) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WaxError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
            main_loop,
            runtime,
        })
    }

    pub(crate) fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path);
        let http = self.http.clone();
        let runtime = self.runtime.clone();
        let task = self
            .main_loop
            .call(move || runtime.spawn(fetch_bytes(http, url)))
            .await?;
        task.await
            .map_err(|e| WaxError::Transport(format!("fetch task failed: {e}")))?
    }
}

async fn fetch_bytes(http: reqwest::Client, url: String) -> Result<Vec<u8>> {
    debug!(%url, "fetching packaged content");
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| WaxError::Transport(format!("GET {url}: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(WaxError::NotFound(url));
    }
    if !status.is_success() {
        return Err(WaxError::Transport(format!("GET {url}: HTTP {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| WaxError::Transport(format!("GET {url}: {e}")))?;
    Ok(bytes.to_vec())
}

#[async_trait]
impl ContentResolver for NetworkResolver {
    async fn exists(&self, path: &str) -> bool {
        match self.fetch(path).await {
            Ok(_) => true,
            Err(e) => {
                debug!(path, error = %e, "packaged content unavailable");
                false
            }
        }
    }

    async fn read_all(&self, path: &str) -> Result<Vec<u8>> {
        self.fetch(path).await
    }

    fn kind(&self) -> ContentSource {
        ContentSource::Network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use wax_common::MainLoop;

    async fn packaged_assets() -> String {
        let app = Router::new()
            .route("/bundle/index.html", get(|| async { "<h1>packaged</h1>" }))
            .route(
                "/bundle/broken.js",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/bundle/")
    }

    fn resolver(base: String) -> (NetworkResolver, std::thread::JoinHandle<()>) {
        let (main_loop, handle) = MainLoop::new();
        let worker = std::thread::spawn(move || main_loop.run());
        let resolver = NetworkResolver::new(base, handle, Handle::current()).unwrap();
        (resolver, worker)
    }

    #[test]
    fn url_joins_without_double_slash() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (_main_loop, handle) = MainLoop::new();
        let r = NetworkResolver::new("http://host/assets/", handle, rt.handle().clone()).unwrap();
        assert_eq!(r.url_for("/index.html"), "http://host/assets/index.html");
        assert_eq!(r.url_for("js/app.js"), "http://host/assets/js/app.js");
    }

    #[tokio::test]
    async fn reads_through_main_loop() {
        let base = packaged_assets().await;
        let (resolver, worker) = resolver(base);

        assert!(resolver.exists("index.html").await);
        assert_eq!(
            resolver.read_all("index.html").await.unwrap(),
            b"<h1>packaged</h1>"
        );

        drop(resolver);
        worker.join().unwrap();
    }

    #[tokio::test]
    async fn http_404_is_not_found() {
        let base = packaged_assets().await;
        let (resolver, _worker) = resolver(base);

        assert!(!resolver.exists("missing.css").await);
        let err = resolver.read_all("missing.css").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn http_error_status_is_transport_error_with_detail() {
        let base = packaged_assets().await;
        let (resolver, _worker) = resolver(base);

        let err = resolver.read_all("broken.js").await.unwrap_err();
        assert!(matches!(err, WaxError::Transport(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn closed_main_loop_fails_reads() {
        let (main_loop, handle) = MainLoop::new();
        drop(main_loop);
        let resolver = NetworkResolver::new("http://127.0.0.1:9/", handle, Handle::current()).unwrap();
        let err = resolver.read_all("index.html").await.unwrap_err();
        assert!(matches!(err, WaxError::MainLoopClosed));
    }
}
