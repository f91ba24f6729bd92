//! Basic usage: named constructors, wrapping, and the client-safe payload.
//!
//! Run with: cargo run --example basic_usage

use rampart_errors::{Challenge, Detail, Normalizer};

fn main() {
    let errors = Normalizer::new();

    // A plain client error: payload carries the message as-is.
    let err = errors.not_found(Some("no user with id 42"), None);
    println!("404 payload: {}", serde_json::to_string(err.payload()).unwrap());

    // Attach context data; it never reaches the payload.
    let err = errors.conflict(
        Some("email already registered"),
        Some(serde_json::json!({ "email": "user@example.com" })),
    );
    println!("409 payload: {}", serde_json::to_string(err.payload()).unwrap());
    println!("409 data (internal): {:?}", err.data());

    // Wrap a foreign failure: the cause stays internal, the payload lies politely.
    let parse_failure = "{".parse::<serde_json::Value>().unwrap_err();
    let err = errors.internal(Some("loading config"), Some(Detail::cause(parse_failure)));
    println!("500 internal message: {}", err.message());
    println!("500 payload: {}", serde_json::to_string(err.payload()).unwrap());

    // Authentication challenge.
    let challenge = Challenge::named("Bearer").attribute("realm", "api");
    let err = errors.unauthorized_with(Some("token expired"), challenge);
    println!(
        "401 WWW-Authenticate: {}",
        err.headers().get("WWW-Authenticate").unwrap()
    );
}
