use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Coalescing resize flag shared between a session and whatever host
/// callback watches its drawable.
///
/// Observers only ever raise the flag; the session takes it at the top
/// of its next update and does the geometry work there, on the render
/// turn. Any number of raises between two updates collapse into one
/// application.
#[derive(Debug, Clone, Default)]
pub struct ResizeSignal(Arc<AtomicBool>);

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the drawable as resized.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Consumes the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_the_flag() {
        let signal = ResizeSignal::new();
        assert!(!signal.take());

        signal.raise();
        assert!(signal.is_raised());
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn clones_share_the_flag() {
        let signal = ResizeSignal::new();
        let observer = signal.clone();

        observer.raise();
        observer.raise();
        assert!(signal.take());
        assert!(!signal.take());
    }
}
