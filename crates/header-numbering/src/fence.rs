//! Code fence tracking
//!
//! Every full-document scan owns one tracker so header-like lines inside
//! fenced code blocks are never classified.

/// Marker that opens and closes a fenced code block
pub const FENCE_MARKER: &str = "```";

/// Single-bit "inside a code block" state machine
#[derive(Debug, Default, Clone)]
pub struct CodeFenceTracker {
    inside: bool,
}

impl CodeFenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line; returns true when the line must be skipped
    ///
    /// A line starting with the marker toggles the state once per marker it
    /// contains, so a one-line fence (```` ```code``` ````) toggles twice and
    /// leaves the state unchanged. Fence lines themselves are always skipped.
    pub fn observe(&mut self, line: &str) -> bool {
        if line.starts_with(FENCE_MARKER) {
            // NOTE: a one-line fence nets to no change; kept as observed
            // behavior until the intended semantics are confirmed.
            for _ in 0..line.matches(FENCE_MARKER).count() {
                self.inside = !self.inside;
            }
            return true;
        }
        self.inside
    }
}
