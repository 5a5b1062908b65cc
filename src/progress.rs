//! Progress reporting contract for the streaming engine.
//!
//! The core never renders anything itself. It only calls back with
//! monotonically nondecreasing `(processed, total)` pairs. The CLI's
//! [`crate::ui::progress::ProgressBar`] is one consumer; a caller embedding
//! this crate as a library can supply any other.

/// A progress callback: `processed` and `total` are both in bytes.
///
/// `total` is `0` when the payload length is not known in advance (not
/// currently possible for this crate's operations, but kept permissive for
/// future callers). Implementations MUST be cheap: they are invoked once per
/// chunk.
pub type ProgressCallback<'a> = dyn FnMut(u64, u64) + Send + 'a;

/// A no-op sink used when a caller does not care about progress.
pub fn noop(_processed: u64, _total: u64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_trait_object_is_invocable() {
        let mut calls = Vec::new();
        let mut cb: Box<ProgressCallback> = Box::new(|p, t| calls.push((p, t)));
        cb(10, 100);
        cb(100, 100);
        drop(cb);
        assert_eq!(calls, vec![(10, 100), (100, 100)]);
    }
}
