use std::{convert::Infallible, sync::Arc, time::Duration};

use http_body_util::Full;
use hyper::{
    Request, Response, StatusCode,
    body::{Bytes, Incoming},
    header,
    server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use log::{debug, error, info};
use tokio::net::TcpListener;

use gpsd_exporter::{
    error::Result,
    exporter::{CONTENT_TYPE, Exporter},
};

/// Pause after a failed accept (fd exhaustion) before retrying
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serves scrape requests until the listener fails.
pub async fn serve(address: &str, metrics_path: &str, exporter: Arc<Exporter>) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    let metrics_path: Arc<str> = Arc::from(metrics_path);

    info!("listening on {} (metrics on {})", address, metrics_path);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("http accept error: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            },
        };

        let exporter = Arc::clone(&exporter);
        let metrics_path = Arc::clone(&metrics_path);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let response = route(req.uri().path(), &metrics_path, || exporter.render());
                async move { Ok::<_, Infallible>(response) }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("http connection with {} failed: {}", peer, e);
            }
        });
    }
}

/// Answers a request for `path`. `render` produces the exposition and only
/// runs on the metrics path.
fn route<F>(path: &str, metrics_path: &str, render: F) -> Response<Full<Bytes>>
where
    F: FnOnce() -> Result<Vec<u8>>,
{
    if path == metrics_path {
        match render() {
            Ok(body) => respond(StatusCode::OK, CONTENT_TYPE, Bytes::from(body)),
            Err(e) => {
                error!("failed to render metrics: {}", e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain",
                    Bytes::from(e.to_string()),
                )
            },
        }
    } else if path == "/" {
        respond(
            StatusCode::OK,
            "text/html",
            Bytes::from(landing_page(metrics_path)),
        )
    } else {
        respond(
            StatusCode::NOT_FOUND,
            "text/plain",
            Bytes::from_static(b"not found"),
        )
    }
}

fn respond(status: StatusCode, content_type: &str, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Full::new(body))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"bad response"))))
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>
<head><title>GPSD Exporter</title></head>
<body>
<h1>GPSD Exporter</h1>
<p><a href=\"{}\">Metrics</a></p>
</body>
</html>
",
        metrics_path
    )
}
