//! Shared helpers for Studio client integration tests.

#![allow(dead_code)]

use std::io;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use studio_client::{Backoff, StudioClient, StudioConfig};
use tracing::subscriber::DefaultGuard;
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

/// Records requested waits instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingBackoff {
    waits: Mutex<Vec<(u32, Duration)>>,
}

impl RecordingBackoff {
    pub fn waits(&self) -> Vec<(u32, Duration)> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backoff for RecordingBackoff {
    async fn wait(&self, next_attempt: u32, delay: Duration) {
        self.waits.lock().unwrap().push((next_attempt, delay));
    }
}

pub fn api_path(endpoint: &str) -> String {
    format!("/api/public/v1/{}", endpoint)
}

pub fn test_client(server: &MockServer) -> (StudioClient, Arc<RecordingBackoff>) {
    let backoff = Arc::new(RecordingBackoff::default());
    let config = StudioConfig::new(API_KEY)
        .with_base_url(server.uri())
        .with_debug(true);
    let client = StudioClient::new(config)
        .unwrap()
        .with_backoff(backoff.clone());
    (client, backoff)
}

/// "METHOD /path" for every request the server received, in order.
pub async fn request_log(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

/// Write an image fixture into a fresh temp dir.
pub fn write_fixture(name: &str, content: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Base URL of a local port with nothing listening on it.
pub fn closed_port_uri() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Log sink shared with a thread-local subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture DEBUG and above on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
