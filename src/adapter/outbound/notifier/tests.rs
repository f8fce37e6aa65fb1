use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use super::payload::EventPayload;
use super::webhook::{classify, retry_delay, Attempt, WebhookConfig, WebhookNotifier};
use crate::domain::{CardColour, Event, EventKind, GameweekId, PlayerId};
use crate::port::{Notifier, NotifierRegistry, NullNotifier};
use crate::testkit::domain::base_time;

struct CountingNotifier {
    count: Arc<AtomicUsize>,
}

impl Notifier for CountingNotifier {
    fn notify(&self, _event: Event) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn red_card() -> Event {
    Event::count(
        EventKind::Card(CardColour::Red),
        PlayerId::new(7),
        GameweekId::new(3),
        0,
        1,
        -3,
        base_time(),
    )
}

#[test]
fn test_registry_notify_all() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut registry = NotifierRegistry::new();

    registry.register(Box::new(CountingNotifier {
        count: count.clone(),
    }));
    registry.register(Box::new(CountingNotifier {
        count: count.clone(),
    }));

    registry.notify_all(&red_card());

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_registry_len_and_is_empty() {
    let mut registry = NotifierRegistry::new();
    assert!(registry.is_empty());

    registry.register(Box::new(NullNotifier));
    assert!(!registry.is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_payload_carries_type_and_values() {
    let event = red_card();
    let json = serde_json::to_value(EventPayload::new(&event)).unwrap();

    assert_eq!(json["type"], "red_card");
    assert_eq!(json["performance"], true);
    assert_eq!(json["player_id"], 7);
    assert_eq!(json["gameweek"], 3);
    assert_eq!(json["points_change"], -3);
    assert_eq!(json["new_value"]["value"], 1);
}

#[test]
fn test_status_classification() {
    assert_eq!(classify(StatusCode::OK), Attempt::Delivered);
    assert_eq!(classify(StatusCode::NO_CONTENT), Attempt::Delivered);
    assert_eq!(classify(StatusCode::TOO_MANY_REQUESTS), Attempt::Retry);
    assert_eq!(classify(StatusCode::BAD_GATEWAY), Attempt::Retry);
    assert_eq!(classify(StatusCode::NOT_FOUND), Attempt::GiveUp);
}

#[test]
fn test_retry_delay_doubles() {
    let base = std::time::Duration::from_millis(500);
    assert_eq!(retry_delay(base, 1), base);
    assert_eq!(retry_delay(base, 2), base * 2);
    assert_eq!(retry_delay(base, 3), base * 4);
}

struct SlowNotifier;

#[async_trait]
impl Notifier for SlowNotifier {
    fn notify(&self, _event: Event) {}

    async fn close(&self) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
}

/// Accepts connections and answers every request with 200, keeping the
/// request text.
async fn spawn_webhook_sink() -> (Url, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}/hook", listener.local_addr().unwrap())).unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let sink = sink.clone();
            tokio::spawn(async move {
                let request = read_request(&mut stream).await;
                sink.lock().push(request);
                let _ = stream
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await;
            });
        }
    });

    (url, received)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).into_owned();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn webhook_config(url: Url) -> WebhookConfig {
    WebhookConfig {
        url,
        max_attempts: 2,
        backoff: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_close_delivers_queued_webhook_events() {
    let (url, received) = spawn_webhook_sink().await;
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(WebhookNotifier::new(webhook_config(url))));

    registry.notify_all(&red_card());
    registry.notify_all(&red_card());

    // The process would exit right after this returns.
    assert!(registry.close_all(Duration::from_secs(10)).await);

    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert!(received[0].starts_with("POST /hook"));
    assert!(received.iter().all(|request| request.contains("\"red_card\"")));
}

#[tokio::test]
async fn test_notify_after_close_is_dropped() {
    let (url, received) = spawn_webhook_sink().await;
    let notifier = WebhookNotifier::new(webhook_config(url));

    notifier.close().await;
    notifier.notify(red_card());
    notifier.close().await;

    assert!(received.lock().is_empty());
}

#[tokio::test]
async fn test_close_all_gives_up_after_limit() {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(SlowNotifier));
    registry.register(Box::new(NullNotifier));

    assert!(!registry.close_all(Duration::from_millis(50)).await);
}
