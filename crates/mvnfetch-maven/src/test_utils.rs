//! In-memory transport for resolver tests.

use async_trait::async_trait;
use bytes::Bytes;
use mvnfetch_core::{Transport, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Serves registered addresses from memory and counts every request.
///
/// Unknown addresses answer with a 404 status. Addresses starting with a
/// registered stall prefix sleep before answering, and addresses starting
/// with a registered trigger prefix cancel its token.
#[derive(Default)]
pub(crate) struct MemoryTransport {
    files: Mutex<HashMap<String, Bytes>>,
    hits: Mutex<HashMap<String, usize>>,
    stalls: Mutex<Vec<(String, Duration)>>,
    triggers: Mutex<Vec<(String, CancellationToken)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, address: impl Into<String>, data: impl Into<Bytes>) {
        self.files
            .lock()
            .unwrap()
            .insert(address.into(), data.into());
    }

    pub(crate) fn stall(&self, prefix: impl Into<String>, delay: Duration) {
        self.stalls.lock().unwrap().push((prefix.into(), delay));
    }

    pub(crate) fn cancel_on(&self, prefix: impl Into<String>, token: CancellationToken) {
        self.triggers.lock().unwrap().push((prefix.into(), token));
    }

    /// Highest number of requests that were being served at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn hits(&self, address: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch_bytes(&self, address: &str, _is_local: bool) -> mvnfetch_core::Result<Bytes> {
        *self
            .hits
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default() += 1;

        for (prefix, token) in self.triggers.lock().unwrap().iter() {
            if address.starts_with(prefix.as_str()) {
                token.cancel();
            }
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .stalls
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| address.starts_with(prefix.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.files
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                location: address.to_string(),
                status: 404,
            })
    }
}

/// Minimal POM declaring `dependencies` as `(notation, scope)` pairs.
pub(crate) fn pom_with(dependencies: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from("<project>\n  <dependencies>\n");
    for (notation, scope) in dependencies {
        let parts: Vec<&str> = notation.split(':').collect();
        xml.push_str("    <dependency>\n");
        xml.push_str(&format!("      <groupId>{}</groupId>\n", parts[0]));
        xml.push_str(&format!("      <artifactId>{}</artifactId>\n", parts[1]));
        xml.push_str(&format!("      <version>{}</version>\n", parts[2]));
        if let Some(scope) = scope {
            xml.push_str(&format!("      <scope>{scope}</scope>\n"));
        }
        xml.push_str("    </dependency>\n");
    }
    xml.push_str("  </dependencies>\n</project>\n");
    xml
}
