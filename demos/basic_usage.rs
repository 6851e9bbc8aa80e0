use palisade_status::{BuildError, Code, Mapper, Reason};

fn build_mapper() -> Result<Mapper, BuildError> {
    Mapper::builder()
        // Postgres connection trouble is a dependency outage, not a generic 503
        .http_prefix(Code::UNAVAILABLE, "storage.pg", 503)
        .http_prefix(Code::UNAVAILABLE, "storage.*.connect", 504)
        // Clients that hang up are not our fault
        .http_override(Code::CANCELED, 408)
        .build()
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    let mapper = match build_mapper() {
        Ok(m) => m,
        Err(err) => {
            eprintln!("invalid status rules: {err}");
            std::process::exit(1);
        }
    };

    let failures = [
        ("unavailable", "storage.pg.connect_timeout"),
        ("unavailable", "storage.s3.connect"),
        ("canceled", ""),
        ("Not-Found", "catalog.item"),
        ("teapot_brewing", "kettle.boil"),
    ];

    for (raw_code, raw_reason) in failures {
        // Classification happens at the edge; the mapper only sees canonical values
        let (Ok(code), Ok(reason)) = (Code::parse(raw_code), Reason::parse(raw_reason)) else {
            println!("skipping unclassifiable failure {raw_code:?}/{raw_reason:?}");
            continue;
        };

        let status = mapper.status(&code, &reason);
        println!("{code:<16} {reason:<30} -> HTTP {} / gRPC {}", status.http, status.grpc);
    }

    println!("\nWhy did storage.pg.connect_timeout get its status?\n");
    let code = Code::UNAVAILABLE;
    let reason = Reason::from_static("storage.pg.connect_timeout");
    println!("{}", mapper.explanation(&code, &reason));
}
