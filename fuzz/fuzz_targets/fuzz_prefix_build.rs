#![no_main]

use libfuzzer_sys::fuzz_target;
use palisade_status::{Code, Mapper, Reason};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // First line is the reason to query, the rest are raw patterns
    let mut lines = text.lines();
    let query = lines.next().unwrap_or_default();
    let builder = lines
        .enumerate()
        .fold(Mapper::builder(), |b, (i, pattern)| {
            b.http_prefix(Code::UNAVAILABLE, pattern, 400 + (i % 200) as u16)
        });

    let Ok(mapper) = builder.build() else {
        return;
    };
    let reason = Reason::parse(query).unwrap_or_default();
    let e = mapper.explanation(&Code::UNAVAILABLE, &reason);
    assert_eq!(e.http.value, mapper.http_status(&Code::UNAVAILABLE, &reason));
    let _ = e.to_string();
});
