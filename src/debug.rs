//! Macros for last-resort debugging.
//!
//! Since decoding errors only carry a message, the position, and the path
//! through the values, finding out which check produced an error can still
//! be hard. To remedy this somewhat, this module contains a macro `xerr!()`
//! that will print out a backtrace if the `extra-debug` feature is enabled
//! during build before resolving into whatever the expression it encloses
//! resolves to otherwise. Use it whenever you initially produce an error,
//! i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(Err(prim.content_err("invalid foo")))
//! }
//! ```
//!
//! or, with an early return:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(prim.content_err("invalid foo")));
//! }
//! ```

#[cfg(feature = "extra-debug")]
pub use backtrace::Backtrace;

#[cfg(feature = "extra-debug")]
macro_rules! xerr {
    ($test:expr) => {{
        eprintln!(
            "--- EXTRA DEBUG ---\n{:?}\n--- EXTRA DEBUG ---",
            $crate::debug::Backtrace::new()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
macro_rules! xerr {
    ($test:expr) => { $test };
}
