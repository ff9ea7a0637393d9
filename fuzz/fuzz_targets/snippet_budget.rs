#![no_main]

use libfuzzer_sys::fuzz_target;

use sanitize::generate_snippet;

fuzz_target!(|data: (u8, &str)| {
    let (budget, html) = data;
    let budget = budget as usize;
    let snippet = generate_snippet(html, budget);
    // The early-abort path must honor the character budget exactly and
    // never emit leading or trailing whitespace.
    assert!(snippet.chars().count() <= budget);
    assert_eq!(snippet.trim(), snippet);
});
