use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use redwatch_crawler::{CrawlerConfig, Fetch, FetchError, HttpFetcher};

/// One-shot HTTP server answering successive connections with the given
/// status lines, counting how many requests it actually saw.
fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{addr}"), hits)
}

fn fetcher() -> HttpFetcher {
    let config = CrawlerConfig {
        request_delay_seconds: 0.0,
        max_retries: 3,
        ..Default::default()
    };
    HttpFetcher::new(&config).unwrap()
}

#[test]
fn forbidden_is_gone_after_a_single_request() {
    let (base, hits) = serve(vec![("403 Forbidden", "")]);
    let err = fetcher().fetch(&format!("{base}/r/private/")).unwrap_err();
    assert!(matches!(err, FetchError::Gone(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn not_found_is_gone_after_a_single_request() {
    let (base, hits) = serve(vec![("404 Not Found", "")]);
    let err = fetcher().fetch(&format!("{base}/user/nobody/")).unwrap_err();
    assert!(matches!(err, FetchError::Gone(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn server_errors_are_retried_until_exhausted() {
    let (base, hits) = serve(vec![
        ("500 Internal Server Error", ""),
        ("500 Internal Server Error", ""),
        ("500 Internal Server Error", ""),
    ]);
    let err = fetcher().fetch(&format!("{base}/r/testsub/")).unwrap_err();
    assert!(matches!(err, FetchError::Exhausted { .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn transient_error_then_success_returns_the_body() {
    let (base, hits) = serve(vec![
        ("503 Service Unavailable", ""),
        ("200 OK", "<html>listing</html>"),
    ]);
    let body = fetcher().fetch(&format!("{base}/r/testsub/")).unwrap();
    assert_eq!(body, "<html>listing</html>");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
