//! Stack growth for the recursive parts of the pipeline.
//!
//! Nested parentheses and operands recurse once per level in both the parser
//! and the evaluator. Wrapping those entry points keeps deep but valid input
//! from overflowing the thread's stack.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first switching to a fresh stack segment if the current one is
/// close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
