#![no_main]

use html::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut doc = Document::new();
    let _ = doc.set_option("input-xml", "yes");
    let _ = doc.set_option("force-output", "yes");
    if doc.load_bytes(data).is_ok() {
        doc.run();
        assert!(doc.dom().check_links().is_ok());
    }
});
