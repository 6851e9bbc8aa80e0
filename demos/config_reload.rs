use palisade_status::{Code, Directive, Reason, SharedMapper, StatusMapper};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const INITIAL: &str = r#"[
    {"op": "add_prefix", "code": "unavailable", "pattern": "storage.pg", "status": {"http": 503}},
    {"op": "set_override", "code": "canceled", "status": {"http": 408}}
]"#;

const UPDATED: &str = r#"[
    {"op": "add_prefix", "code": "unavailable", "pattern": "storage.pg", "status": {"http": 503}},
    {"op": "set_override", "code": "canceled", "status": {"http": 499}},
    {"op": "set_fallback", "status": {"grpc": "UNKNOWN"}}
]"#;

// Rejected: a bare wildcard would shadow every reason
const BROKEN: &str = r#"[
    {"op": "add_prefix", "code": "timeout", "pattern": "*", "status": {"http": 504}}
]"#;

fn parse(config: &str) -> Vec<Directive> {
    serde_json::from_str(config).unwrap_or_else(|err| {
        eprintln!("unreadable config: {err}");
        std::process::exit(1);
    })
}

/// Stand-in for an HTTP handler that only knows the adapter trait.
fn handle(mapper: &dyn StatusMapper, code: &Code, reason: &Reason) -> u16 {
    mapper.http_status(code, reason)
}

fn main() {
    println!("--- Configuration Reload Example ---\n");

    let shared = Arc::new(SharedMapper::default());
    if let Err(err) = shared.reload(parse(INITIAL)) {
        eprintln!("initial config rejected: {err}");
        std::process::exit(1);
    }

    let reader = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for i in 0..5 {
                let status = handle(shared.as_ref(), &Code::CANCELED, &Reason::EMPTY);
                println!("request {i}: canceled -> {status}");
                thread::sleep(Duration::from_millis(20));
            }
        })
    };

    thread::sleep(Duration::from_millis(30));
    match shared.reload(parse(UPDATED)) {
        Ok(()) => println!("reloaded: canceled now maps to 499"),
        Err(err) => println!("reload rejected: {err}"),
    }

    match shared.reload(parse(BROKEN)) {
        Ok(()) => println!("unexpected: broken config accepted"),
        Err(err) => println!("reload rejected, previous rules kept: {err}"),
    }

    if reader.join().is_err() {
        eprintln!("reader thread panicked");
    }

    println!("\n{}", shared.explain(&Code::CANCELED, &Reason::EMPTY));
}
