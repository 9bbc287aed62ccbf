#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — errors are fine, panics are bugs.
        let mut parts = s.splitn(3, '\n');
        let tenant = parts.next().unwrap_or("");
        let month = parts.next().unwrap_or("");
        let year = parts.next().unwrap_or("");
        let _ = rentomatic::store::map_panel_selection(tenant, month, year);
    }
});
