// src/checker/http.rs
// =============================================================================
// This module is the heart of url-sentry: it health-checks URLs by making
// HTTP requests concurrently.
//
// Key functionality:
// - Issues one GET request per target URL
// - Runs every check at the same time (one task per URL)
// - Applies a timeout to the whole request/response cycle
// - Streams results into a channel as each check finishes
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Enums: To represent the up/down outcome of a check
// - Channels (mpsc): A concurrency-safe sink the caller drains
// - Streams: For the optional concurrency cap
// =============================================================================

use futures::stream::{self, StreamExt};  // StreamExt gives us .buffer_unordered()
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

// The outcome of checking a single URL
//
// #[derive(Serialize, Deserialize)] lets us convert to/from JSON
// The serde 'tag' attribute turns the variant name into a "result" field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckResult {
    /// The server answered within the timeout.
    ///
    /// ANY status code counts as Up here, including 404 and 500 - the server
    /// is reachable and responding, and what the code means is the caller's
    /// call to make.
    Up {
        url: String,
        status: u16,
    },
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout, or a malformed reply. The reason is kept as text.
    Down {
        url: String,
        error: String,
    },
}

impl CheckResult {
    /// The URL this result belongs to
    pub fn url(&self) -> &str {
        match self {
            CheckResult::Up { url, .. } => url,
            CheckResult::Down { url, .. } => url,
        }
    }

    /// Helper method to check whether the target answered at all
    pub fn is_up(&self) -> bool {
        matches!(self, CheckResult::Up { .. })
    }
}

// Checks many URLs concurrently and streams the results back
//
// This is the main entry point for health checking. It returns immediately
// with the receiving end of a channel; one CheckResult per target arrives on
// it, in whatever order the checks happen to finish, and the channel closes
// once every check is accounted for. Draining to the end therefore always
// yields exactly `targets.len()` results - a failed check is still a result,
// never a lost one.
//
// Parameters:
//   targets: the URLs to check (duplicates allowed, each checked on its own)
//   timeout: applied per request to the whole connect+read cycle; must be
//            positive (the CLI layer enforces this)
//   concurrency: None = one task per target, fully parallel (the default);
//                Some(n) = at most n checks in flight at once. With thousands
//                of targets the unbounded mode can exhaust sockets, so large
//                batches should pass a cap.
//
// Why a channel instead of returning a Vec?
// - The caller can print each line the moment its check finishes
// - Slow targets (e.g. ones that run into the timeout) don't hold up the
//   reporting of fast ones
pub fn check_urls(
    targets: Vec<String>,
    timeout: Duration,
    concurrency: Option<usize>,
) -> mpsc::Receiver<CheckResult> {
    // One channel slot per target, so producers never block even if the
    // consumer drains late. With no targets the channel still needs a
    // nonzero capacity to be constructed.
    let (tx, rx) = mpsc::channel(targets.len().max(1));

    // One shared client for all requests (connection pooling).
    // The timeout set here covers the entire request, connect + read.
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    match concurrency {
        None => {
            // One independent task per target. Each task holds a clone of the
            // sender; the channel closes when the last clone is dropped, i.e.
            // when the last check has finished. That is our completion
            // barrier - no counting needed.
            for url in targets {
                let client = client.clone();  // Cheap: it's an Arc inside
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = check_single_url(client, url).await;
                    // Fails only if the caller dropped the receiver, in which
                    // case nobody is listening and the result can go nowhere
                    let _ = tx.send(result).await;
                });
            }
            // Drop the original sender so the spawned clones are the only
            // ones keeping the channel open
            drop(tx);
        }
        Some(cap) => {
            // Capped mode: same per-target futures, but pulled through
            // buffer_unordered so at most `cap` requests are in flight.
            // "unordered" = results come out as they complete, not in
            // submission order - exactly what we want.
            let cap = cap.max(1);
            tokio::spawn(async move {
                let checks = targets.into_iter().map(|url| {
                    let client = client.clone();
                    async move { check_single_url(client, url).await }
                });

                let mut results = stream::iter(checks).buffer_unordered(cap);
                while let Some(result) = results.next().await {
                    if tx.send(result).await.is_err() {
                        break;  // Receiver gone, stop forwarding
                    }
                }
            });
        }
    }

    rx
}

// Checks a single URL
//
// One GET, no retries. A response with any status code at all is Up;
// only a failure to get a response is Down.
async fn check_single_url(client: Client, url: String) -> CheckResult {
    match client.get(&url).send().await {
        Ok(response) => {
            // We only care about the status line. Dropping `response` at the
            // end of this arm releases the connection on every path without
            // ever reading the body.
            let status = response.status().as_u16();
            CheckResult::Up { url, status }
        }
        Err(e) => CheckResult::Down {
            url,
            error: describe_error(&e),
        },
    }
}

// Turns a reqwest error into the human-readable text we attach to Down
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Connection refused / host unreachable
// - Malformed response
fn describe_error(error: &reqwest::Error) -> String {
    // Convert the error to a string once to avoid lifetime issues
    let error_string = error.to_string();

    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            format!("Connection failed: {}", error_string)
        }
    } else {
        error_string
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is 404 "Up"?
//    - This is a reachability check, not a correctness check
//    - A 404 means a server accepted our connection and spoke HTTP to us
//    - The status code is passed along so the caller can judge it
//
// 2. What is mpsc?
//    - "multi-producer, single-consumer" channel from tokio
//    - Every check task is a producer; main() is the one consumer
//    - When all producers are gone, recv() returns None - batch done
//
// 3. Why no join handle / wait group?
//    - In Go you'd pair the channel with a sync.WaitGroup
//    - Here the sender clones ARE the wait group: the channel closing is
//      the signal that every task has finished
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Spawns a tiny local HTTP server that answers every connection with a
    // canned response after an optional delay. Returns the base URL.
    // Keeping tests on 127.0.0.1 means they pass without internet access.
    async fn spawn_server(response: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        format!("http://{}/", addr)
    }

    const OK_RESPONSE: &str =
        "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
    const NOT_FOUND_RESPONSE: &str =
        "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    // Binds a port and immediately releases it, giving us an address where
    // connections get refused
    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    async fn drain(mut rx: mpsc::Receiver<CheckResult>) -> Vec<CheckResult> {
        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    }

    #[tokio::test]
    async fn empty_target_set_completes_immediately_with_no_results() {
        let rx = check_urls(Vec::new(), Duration::from_secs(5), None);
        let results = drain(rx).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn every_target_produces_exactly_one_result() {
        let ok_url = spawn_server(OK_RESPONSE, Duration::ZERO).await;
        let missing_url = spawn_server(NOT_FOUND_RESPONSE, Duration::ZERO).await;
        let refused_url = closed_port_url().await;

        // Duplicates are checked independently, so they count twice
        let targets = vec![
            ok_url.clone(),
            ok_url.clone(),
            missing_url,
            refused_url,
        ];

        let rx = check_urls(targets.clone(), Duration::from_secs(5), None);
        let results = drain(rx).await;

        assert_eq!(results.len(), targets.len());
        let dup_count = results.iter().filter(|r| r.url() == ok_url).count();
        assert_eq!(dup_count, 2);
    }

    #[tokio::test]
    async fn count_invariant_holds_with_a_concurrency_cap() {
        let ok_url = spawn_server(OK_RESPONSE, Duration::ZERO).await;
        let targets = vec![ok_url; 7];

        let rx = check_urls(targets, Duration::from_secs(5), Some(2));
        let results = drain(rx).await;

        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.is_up()));
    }

    #[tokio::test]
    async fn reachable_404_is_reported_as_up() {
        let url = spawn_server(NOT_FOUND_RESPONSE, Duration::ZERO).await;

        let rx = check_urls(vec![url.clone()], Duration::from_secs(5), None);
        let results = drain(rx).await;

        match &results[..] {
            [CheckResult::Up { url: got, status }] => {
                assert_eq!(got, &url);
                assert_eq!(*status, 404);
            }
            other => panic!("expected a single Up result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_reported_as_down() {
        let url = closed_port_url().await;

        let rx = check_urls(vec![url.clone()], Duration::from_secs(5), None);
        let results = drain(rx).await;

        match &results[..] {
            [CheckResult::Down { url: got, error }] => {
                assert_eq!(got, &url);
                assert!(!error.is_empty());
            }
            other => panic!("expected a single Down result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unresolvable_host_is_reported_as_down() {
        // RFC 2606 reserves the .invalid TLD, so resolution always fails -
        // no network access needed
        let url = "http://url-sentry.invalid/".to_string();

        let rx = check_urls(vec![url.clone()], Duration::from_secs(5), None);
        let results = drain(rx).await;

        match &results[..] {
            [CheckResult::Down { url: got, error }] => {
                assert_eq!(got, &url);
                assert!(!error.is_empty());
            }
            other => panic!("expected a single Down result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unresponsive_server_hits_the_timeout() {
        // Server that accepts but takes far longer to answer than we wait
        let url = spawn_server(OK_RESPONSE, Duration::from_secs(30)).await;

        let rx = check_urls(vec![url], Duration::from_millis(250), None);
        let results = drain(rx).await;

        match &results[..] {
            [CheckResult::Down { error, .. }] => {
                assert!(
                    error.contains("timed out"),
                    "expected a timeout description, got: {}",
                    error
                );
            }
            other => panic!("expected a single Down result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn checks_run_in_parallel_not_sequentially() {
        // Five servers that each take 400ms to answer. Run sequentially that
        // would be 2 seconds; in parallel it's roughly one server's worth.
        let delay = Duration::from_millis(400);
        let mut targets = Vec::new();
        for _ in 0..5 {
            targets.push(spawn_server(OK_RESPONSE, delay).await);
        }

        let start = Instant::now();
        let rx = check_urls(targets, Duration::from_secs(5), None);
        let results = drain(rx).await;
        let elapsed = start.elapsed();

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.is_up()));
        assert!(
            elapsed < Duration::from_millis(1600),
            "checks appear to have run sequentially: {:?}",
            elapsed
        );
    }

    #[test]
    fn check_result_serializes_with_a_result_tag() {
        let up = CheckResult::Up {
            url: "http://example.com/".to_string(),
            status: 200,
        };
        let json = serde_json::to_value(&up).unwrap();
        assert_eq!(json["result"], "up");
        assert_eq!(json["status"], 200);
        assert_eq!(json["url"], "http://example.com/");
    }
}
