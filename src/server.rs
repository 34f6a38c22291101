//! HTTP adapter over [`WallpaperRenderer`].
//!
//! Routes:
//!
//! - `GET /wallpaper?done=N&total=365&width=1080&height=1920`
//! - `GET /calendar?year=2024&width=1080&height=1920` (year optional)
//!
//! Responses are `image/png` on success, `400` for bad parameters or
//! progress, `404` for unknown paths and `500` when rendering fails.
//! Requests are served by a fixed pool of worker threads sharing one
//! read-only renderer.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tiny_http::{Header, Method, Request, Response, Server};

use crate::{Canvas, Error, Result, WallpaperRenderer};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on, `host:port`
    pub bind: String,
    /// Worker threads; each renders one request at a time
    pub workers: usize,
    /// Size used when a request omits `width`/`height`
    pub canvas: Canvas,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            workers: num_cpus::get(),
            canvas: Canvas::HD_PORTRAIT,
        }
    }
}

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body,
        }
    }

    fn text(status: u16, msg: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: msg.into().into_bytes(),
        }
    }
}

type Params = HashMap<String, String>;

fn split_url(url: &str) -> (&str, Params) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (path, params)
}

fn param<T: FromStr>(params: &Params, name: &str) -> std::result::Result<Option<T>, Reply> {
    match params.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Reply::text(400, format!("invalid value for `{}`: {:?}", name, raw))),
    }
}

fn required<T: FromStr>(params: &Params, name: &str) -> std::result::Result<T, Reply> {
    param(params, name)?
        .ok_or_else(|| Reply::text(400, format!("missing required parameter `{}`", name)))
}

fn render_reply(result: Result<Vec<u8>>) -> Reply {
    match result {
        Ok(png) => Reply::png(png),
        Err(
            e @ (Error::InvalidProgress { .. } | Error::InvalidCanvas { .. } | Error::InvalidYear(_)),
        ) => Reply::text(400, e.to_string()),
        Err(e) => {
            log::error!("render failed: {}", e);
            Reply::text(500, "render failed")
        }
    }
}

/// Route one GET request URL (path plus query) to the renderer.
pub fn handle(renderer: &WallpaperRenderer, url: &str, default_canvas: Canvas) -> Reply {
    let (path, params) = split_url(url);
    let outcome = (|| -> std::result::Result<Reply, Reply> {
        let width = param(&params, "width")?.unwrap_or(default_canvas.width);
        let height = param(&params, "height")?.unwrap_or(default_canvas.height);
        match path {
            "/wallpaper" => {
                let done: i64 = required(&params, "done")?;
                let total: i64 = param(&params, "total")?.unwrap_or(365);
                Ok(render_reply(renderer.render_linear(total, done, width, height)))
            }
            "/calendar" => {
                let year: Option<i32> = param(&params, "year")?;
                Ok(render_reply(renderer.render_calendar_year(year, width, height)))
            }
            _ => Err(Reply::text(404, "not found")),
        }
    })();
    outcome.unwrap_or_else(|reply| reply)
}

fn respond(request: Request, renderer: &WallpaperRenderer, canvas: Canvas) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = if method == Method::Get {
        // A panicking render must not take the worker down with it.
        panic::catch_unwind(AssertUnwindSafe(|| handle(renderer, &url, canvas))).unwrap_or_else(
            |_| {
                log::error!("render panicked for {}", url);
                Reply::text(500, "render failed")
            },
        )
    } else {
        Reply::text(405, "method not allowed")
    };
    log::info!(
        "{} {} -> {} ({} bytes, {} ms)",
        method,
        url,
        reply.status,
        reply.body.len(),
        started.elapsed().as_millis()
    );

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to write response for {}: {}", url, e);
    }
}

/// A bound listener plus its worker configuration.
pub struct WallpaperServer {
    server: Arc<Server>,
    config: ServerConfig,
}

/// Stops a running [`WallpaperServer`] from another thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
    workers: usize,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        for _ in 0..self.workers {
            self.server.unblock();
        }
    }
}

impl WallpaperServer {
    pub fn bind(config: ServerConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(Error::ConfigError("workers must be at least 1".into()));
        }
        let server = Server::http(config.bind.as_str())
            .map_err(|e| Error::NetworkError(format!("failed to bind {}: {}", config.bind, e)))?;
        Ok(Self {
            server: Arc::new(server),
            config,
        })
    }

    /// Actual listening address (useful when binding port 0).
    pub fn local_addr(&self) -> String {
        self.server.server_addr().to_string()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
            workers: self.config.workers,
        }
    }

    /// Serve until shut down. Blocks the calling thread.
    pub fn run(self, renderer: Arc<WallpaperRenderer>) -> Result<()> {
        log::info!(
            "serving on http://{} with {} workers",
            self.local_addr(),
            self.config.workers
        );
        let handles: Vec<_> = (0..self.config.workers)
            .map(|n| {
                let server = Arc::clone(&self.server);
                let renderer = Arc::clone(&renderer);
                let canvas = self.config.canvas;
                thread::Builder::new()
                    .name(format!("lifewall-worker-{}", n))
                    .spawn(move || {
                        for request in server.incoming_requests() {
                            respond(request, &renderer, canvas);
                        }
                    })
            })
            .collect::<std::io::Result<_>>()?;

        for h in handles {
            if h.join().is_err() {
                log::error!("worker thread panicked");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::NoQuoteSource;
    use crate::rendering::font::FontSource;
    use crate::WallpaperConfig;

    fn renderer() -> WallpaperRenderer {
        WallpaperRenderer::with_parts(
            WallpaperConfig::default(),
            FontSource::UseDefault,
            Box::new(NoQuoteSource),
        )
    }

    const SMALL: Canvas = Canvas {
        width: 200,
        height: 400,
    };

    #[test]
    fn split_url_decodes_query() {
        let (path, params) = split_url("/wallpaper?done=3&total=10&x=a%20b");
        assert_eq!(path, "/wallpaper");
        assert_eq!(params["done"], "3");
        assert_eq!(params["x"], "a b");
        let (path, params) = split_url("/calendar");
        assert_eq!(path, "/calendar");
        assert!(params.is_empty());
    }

    #[test]
    fn wallpaper_route_renders_png() {
        let reply = handle(&renderer(), "/wallpaper?done=3&total=10", SMALL);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/png");
        assert_eq!(&reply.body[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn missing_done_is_bad_request() {
        let reply = handle(&renderer(), "/wallpaper?total=10", SMALL);
        assert_eq!(reply.status, 400);
        assert!(String::from_utf8_lossy(&reply.body).contains("done"));
    }

    #[test]
    fn invalid_progress_is_bad_request() {
        assert_eq!(handle(&renderer(), "/wallpaper?done=11&total=10", SMALL).status, 400);
        assert_eq!(handle(&renderer(), "/wallpaper?done=-1", SMALL).status, 400);
        assert_eq!(handle(&renderer(), "/wallpaper?done=abc", SMALL).status, 400);
        assert_eq!(handle(&renderer(), "/wallpaper?done=1&width=0", SMALL).status, 400);
    }

    #[test]
    fn oversized_total_is_bad_request() {
        let reply = handle(&renderer(), "/wallpaper?done=0&total=4294967295", SMALL);
        assert_eq!(reply.status, 400);
        assert_eq!(handle(&renderer(), "/wallpaper?done=0&total=100001", SMALL).status, 400);
        assert_eq!(handle(&renderer(), "/wallpaper?done=5&total=5000", SMALL).status, 200);
    }

    #[test]
    fn oversized_canvas_is_bad_request() {
        let reply = handle(
            &renderer(),
            "/wallpaper?done=1&total=10&width=100000&height=100000",
            SMALL,
        );
        assert_eq!(reply.status, 400);
        assert_eq!(
            handle(&renderer(), "/calendar?year=2024&width=8192&height=8192", SMALL).status,
            400
        );
        assert_eq!(
            handle(&renderer(), "/wallpaper?done=1&width=4294967295&height=1", SMALL).status,
            400
        );
    }

    #[test]
    fn calendar_route_and_unknown_path() {
        assert_eq!(handle(&renderer(), "/calendar?year=2024", SMALL).status, 200);
        assert_eq!(handle(&renderer(), "/calendar?year=soon", SMALL).status, 400);
        assert_eq!(handle(&renderer(), "/nope", SMALL).status, 404);
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let cfg = ServerConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(WallpaperServer::bind(cfg), Err(Error::ConfigError(_))));
    }
}
