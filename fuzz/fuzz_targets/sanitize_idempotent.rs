#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;

use sanitize::{Policy, sanitize};

static DEFAULT: LazyLock<Policy> = LazyLock::new(Policy::default);
static STRIP_ALL: LazyLock<Policy> = LazyLock::new(|| Policy {
    tags: Default::default(),
    strip: true,
    ..Policy::default()
});
static KEEP_COMMENTS: LazyLock<Policy> = LazyLock::new(|| Policy {
    strip_comments: false,
    ..Policy::default()
});

fuzz_target!(|input: &str| {
    // Sanitizing its own output must change nothing, whether disallowed
    // markup is escaped, everything is stripped, or comments are kept.
    for policy in [&*DEFAULT, &*STRIP_ALL, &*KEEP_COMMENTS] {
        let once = sanitize(input, policy);
        assert_eq!(sanitize(&once, policy), once);
    }

    // With no tags allowed and strip on, no markup character can survive.
    let stripped = sanitize(input, &STRIP_ALL);
    assert!(!stripped.contains('<') && !stripped.contains('>'));
});
