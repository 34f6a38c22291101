#![cfg(feature = "network")]

//! Quote provider against a local HTTP server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lifewall::quote::{fetch_quote, FetchError, HttpQuoteSource, QuotePolicy, QuoteSource};
use tiny_http::{Response, Server};

/// Serve `bodies[i]` (status, body) for the i-th request, repeating the last.
fn start_quote_server(bodies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_string();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let (status, body) = bodies[n.min(bodies.len() - 1)];
            let resp = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    "Content-Type: application/json"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                );
            let _ = request.respond(resp);
        }
    });
    (format!("http://{}/stoic-quote", addr), hits)
}

#[test]
fn fetches_and_parses_quote() {
    let (url, hits) = start_quote_server(vec![(
        200,
        r#"{"data":{"quote":"Luck is what happens when preparation meets opportunity.","author":"Seneca"}}"#,
    )]);
    let source = HttpQuoteSource::new(url, 5000).unwrap();
    let quote = fetch_quote(&source, QuotePolicy::default()).expect("quote");
    assert_eq!(quote.author, "Seneca");
    assert!(quote.text.starts_with("Luck"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn retries_through_errors_and_long_quotes() {
    let long = r#"{"data":{"quote":"This quote is far too long to fit on two lines of a phone wallpaper at the configured font size, so it is skipped.","author":"Nobody"}}"#;
    let (url, hits) = start_quote_server(vec![
        (500, "oops"),
        (200, "not json"),
        (200, long),
        (200, r#"{"data":{"quote":"Begin at once to live.","author":"Seneca"}}"#),
    ]);
    let source = HttpQuoteSource::new(url, 5000).unwrap();
    let quote = fetch_quote(&source, QuotePolicy::default()).expect("quote");
    assert_eq!(quote.text, "Begin at once to live.");
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[test]
fn gives_up_after_budget() {
    let (url, hits) = start_quote_server(vec![(503, "busy")]);
    let source = HttpQuoteSource::new(url, 5000).unwrap();
    assert_eq!(source.fetch(), Err(FetchError::Status(503)));
    let policy = QuotePolicy {
        max_retries: 3,
        max_length: 80,
    };
    assert!(fetch_quote(&source, policy).is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[test]
fn unreachable_endpoint_is_a_network_error() {
    // Bind then drop to get a port with nothing listening
    let addr = {
        let s = Server::http("127.0.0.1:0").unwrap();
        s.server_addr().to_string()
    };
    let source = HttpQuoteSource::new(format!("http://{}/", addr), 1000).unwrap();
    assert!(matches!(
        source.fetch(),
        Err(FetchError::Network(_)) | Err(FetchError::Timeout)
    ));
}
