#![no_main]

use html::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut doc = Document::new();
    let _ = doc.set_option("force-output", "yes");
    if doc.load_bytes(data).is_err() {
        return;
    }
    doc.run();
    assert!(doc.dom().check_links().is_ok());
    let Some(first) = doc.output().map(str::to_string) else {
        return;
    };
    // Output must survive another pass.
    let mut again = Document::from_text(&first);
    let _ = again.set_option("force-output", "yes");
    again.run();
    assert!(again.output().is_some());
});
