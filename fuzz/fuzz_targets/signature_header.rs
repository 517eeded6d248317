//! Fuzz target for signature header parsing.
//!
//! Parsing must never panic, and any header that parses must survive
//! rendering and parsing again.

#![no_main]

use authsignal_webhooks::SignatureHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(header) = SignatureHeader::parse(Some(data)) else {
        return;
    };

    assert_ne!(header.timestamp, -1);
    assert!(!header.signatures.is_empty());

    let reparsed = SignatureHeader::parse(Some(&header.to_header_value()))
        .expect("rendered header must parse");
    assert_eq!(reparsed, header);
});
