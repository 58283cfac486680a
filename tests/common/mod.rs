//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which owns a scratch directory, a stand-in
//! `ffmpeg` shell script and a fully-constructed [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port
//! for HTTP-level testing.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use cm_av::ToolRegistry;
use cm_core::config::Config;
use cm_server::context::AppContext;
use cm_server::router::build_router;

/// How the stand-in ffmpeg behaves once invoked.
#[derive(Debug, Clone, Copy)]
pub enum FakeFfmpeg {
    /// Touch the output file and exit 0.
    Succeeds,
    /// Print a diagnostic to stderr and exit 1.
    Fails,
    /// Take a moment, then succeed like [`FakeFfmpeg::Succeeds`].
    Slow,
    /// Never finish on its own.
    Hangs,
}

impl FakeFfmpeg {
    fn body(self) -> &'static str {
        match self {
            FakeFfmpeg::Succeeds => "for last; do :; done\n: > \"$last\"\nexit 0\n",
            FakeFfmpeg::Fails => {
                "echo 'Invalid data found when processing input' >&2\nexit 1\n"
            }
            FakeFfmpeg::Slow => {
                "sleep 0.3\nfor last; do :; done\n: > \"$last\"\nexit 0\n"
            }
            FakeFfmpeg::Hangs => "exec sleep 30\n",
        }
    }
}

/// Test harness wrapping an [`AppContext`] whose ffmpeg is a shell script
/// that records every invocation.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Harness with a succeeding ffmpeg and default configuration.
    pub fn new() -> Self {
        Self::with_ffmpeg(FakeFfmpeg::Succeeds, Config::default())
    }

    /// Harness with the given ffmpeg behavior and configuration.
    ///
    /// The script path is written into `config.tools.ffmpeg_path` so the
    /// registry goes through normal discovery.
    pub fn with_ffmpeg(behavior: FakeFfmpeg, mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let script = write_fake_ffmpeg(dir.path(), behavior);
        config.tools.ffmpeg_path = Some(script);

        let tools = ToolRegistry::discover(&config.tools);
        let ctx = AppContext::new(config, tools);

        Self { ctx, dir }
    }

    /// Harness whose registry has no ffmpeg at all.
    pub fn without_ffmpeg() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let ctx = AppContext::new(Config::default(), ToolRegistry::default());
        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    /// Create a small placeholder file inside the scratch directory and
    /// return its path as a string.
    pub fn media(&self, name: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, b"not really media").expect("failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    /// A path inside the scratch directory that does not exist yet.
    pub fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    /// Argument lists of every ffmpeg invocation so far, oldest first.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        let log = match fs::read_to_string(self.dir.path().join("calls.log")) {
            Ok(log) => log,
            Err(_) => return Vec::new(),
        };

        let mut calls = Vec::new();
        for line in log.lines() {
            if line == "--- call" {
                calls.push(Vec::new());
            } else if let Some(current) = calls.last_mut() {
                current.push(line.to_string());
            }
        }
        calls
    }

    /// `start <pid>` / `end <pid>` markers in the order ffmpeg runs wrote
    /// them. Runs that never overlapped produce strictly paired entries.
    pub fn timeline(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("timeline.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// PID of the most recently started ffmpeg, if any.
    pub fn last_pid(&self) -> Option<u32> {
        fs::read_to_string(self.dir.path().join("ffmpeg.pid"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    /// POST a JSON body to `/combine` through the router without a socket.
    pub async fn post_combine(&self, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/combine")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(self.router(), request).await
    }
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Write an executable `ffmpeg` script into `dir`.
///
/// Each run appends `--- call` and then one argument per line to
/// `calls.log`, stores its PID in `ffmpeg.pid`, and brackets its lifetime
/// with `start`/`end` lines in `timeline.log`. `-version` prints a banner and
/// exits without being recorded.
pub fn write_fake_ffmpeg(dir: &Path, behavior: FakeFfmpeg) -> PathBuf {
    let log = dir.join("calls.log");
    let pid = dir.join("ffmpeg.pid");
    let timeline = dir.join("timeline.log");
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-version\" ]; then echo 'ffmpeg version 6.1-test'; exit 0; fi\n\
         echo \"start $$\" >> '{timeline}'\n\
         trap 'echo \"end $$\" >> \"{timeline}\"' EXIT\n\
         echo '--- call' >> '{log}'\n\
         for arg in \"$@\"; do printf '%s\\n' \"$arg\" >> '{log}'; done\n\
         echo $$ > '{pid}'\n\
         {body}",
        log = log.display(),
        pid = pid.display(),
        timeline = timeline.display(),
        body = behavior.body(),
    );

    let path = dir.join("ffmpeg");
    fs::write(&path, script).expect("failed to write fake ffmpeg");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
