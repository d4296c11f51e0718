#![no_main]

use dtoggle_core::RecordingSink;
use dtoggle_web::{ToggleHost, parse_host_message};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The parser must never panic regardless of input.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = parse_host_message(text);

    // Whatever parses must also be safe to feed through a host.
    let Ok(mut host) =
        ToggleHost::from_config_json(r#"{"entity":"lock.fuzz"}"#, RecordingSink::new())
    else {
        return;
    };
    for line in text.lines() {
        let _ = host.push_json(line);
    }
    host.pump();
    let _ = host.render();
});
