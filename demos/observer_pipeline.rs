//! Observer pipeline: one shared normalizer feeding an error counter.
//!
//! Run with: cargo run --example observer_pipeline

use rampart_errors::Normalizer;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn main() {
    let errors = Arc::new(Normalizer::new());

    let client_errors = Arc::new(AtomicUsize::new(0));
    let server_errors = Arc::new(AtomicUsize::new(0));

    let clients = Arc::clone(&client_errors);
    let servers = Arc::clone(&server_errors);
    errors.subscribe(move |err| {
        if err.status_code().is_client_error() {
            clients.fetch_add(1, Ordering::Relaxed);
        } else {
            servers.fetch_add(1, Ordering::Relaxed);
        }
    });

    // Simulate a handful of concurrent request handlers.
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let errors = Arc::clone(&errors);
            thread::spawn(move || {
                for i in 0..25 {
                    if (worker + i) % 3 == 0 {
                        let _ = errors.internal(Some("backend gave up"), None);
                    } else {
                        let _ = errors.not_found(None, None);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    println!(
        "client errors: {}, server errors: {}",
        client_errors.load(Ordering::Relaxed),
        server_errors.load(Ordering::Relaxed)
    );
}
