use crate::api::PeerNotification;
use crate::config::NotificationConfig;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Long-lived server-push channel delivering "peer answered" notifications.
///
/// `connect` owns the reconnect loop, including capped exponential backoff;
/// the host only calls `connect`/`disconnect` on visibility changes and reads
/// notifications from the returned channel.
pub struct NotificationChannel {
    url: String,
    backoff_base: Duration,
    backoff_cap: Duration,
    worker: Option<JoinHandle<()>>,
}

impl NotificationChannel {
    pub fn new(base_url: &str, config: &NotificationConfig) -> Self {
        Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), config.path),
            backoff_base: Duration::from_secs(config.backoff_base_secs),
            backoff_cap: Duration::from_secs(config.backoff_cap_secs),
            worker: None,
        }
    }

    /// Open the event stream. Reconnects with backoff until `disconnect`.
    pub fn connect(&mut self) -> mpsc::Receiver<PeerNotification> {
        self.disconnect();

        let (tx, rx) = mpsc::channel(16);
        let url = self.url.clone();
        let base = self.backoff_base;
        let cap = self.backoff_cap;

        self.worker = Some(tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut backoff = base;

            loop {
                match client.get(&url).send().await {
                    Ok(response) if response.status().is_success() => {
                        info!("Notification stream connected");
                        backoff = base;
                        if stream_events(response, &tx).await.is_err() {
                            // Receiver dropped, host is gone
                            return;
                        }
                        debug!("Notification stream ended, reconnecting");
                    }
                    Ok(response) => {
                        warn!("Notification stream rejected: {}", response.status());
                    }
                    Err(e) => {
                        warn!("Notification stream connect failed: {}", e);
                    }
                }

                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff, cap);
            }
        }));

        rx
    }

    /// Close the stream and stop reconnecting
    pub fn disconnect(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
            info!("Notification stream disconnected");
        }
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Read `data:` lines off the SSE byte stream and forward decoded payloads.
/// Returns Err only when the receiver side is gone.
async fn stream_events(
    response: reqwest::Response,
    tx: &mpsc::Sender<PeerNotification>,
) -> Result<(), ()> {
    let mut stream = response.bytes_stream();
    let mut pending = String::new();

    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        pending.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = pending.find('\n') {
            let line = pending[..newline].trim_end_matches('\r').to_string();
            pending.drain(..=newline);

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            match serde_json::from_str::<PeerNotification>(data.trim()) {
                Ok(notification) => {
                    if tx.send(notification).await.is_err() {
                        return Err(());
                    }
                }
                Err(e) => debug!("Skipping unparseable notification: {}", e),
            }
        }
    }

    Ok(())
}

/// Double the delay, capped
fn next_backoff(current: Duration, cap: Duration) -> Duration {
    (current * 2).min(cap)
}
