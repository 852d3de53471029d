//! Stack safety for deep recursion.
//!
//! Nested rulesets, mixin bodies and variable dereferences all recurse on the
//! native stack. The recursion limit bounds mixins, but deeply nested source
//! can still exhaust a small thread stack, so recursive entry points grow the
//! stack on demand with `stacker`.
//!
//! For WASM targets where stacker isn't available, the closure is called
//! directly.

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
