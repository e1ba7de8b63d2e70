//! Custom assertion macros
//!
//! Console lines are long single-line JSON blobs; these macros print the
//! whole line on failure instead of a bare `false`.

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert that a string starts with a prefix
#[macro_export]
macro_rules! assert_starts_with {
    ($haystack:expr, $prefix:expr) => {
        assert!(
            $haystack.starts_with($prefix),
            "Expected '{}' to start with '{}'",
            $haystack,
            $prefix
        );
    };
}
