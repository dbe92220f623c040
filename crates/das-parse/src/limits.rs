//! Resource limits for parsing
//!
//! The grammar recurses once per nested group or table literal, so nesting
//! depth is the one thing adversarial input can blow up.

/// Parser limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum nesting of `( ... )` groups and `[ ... ]` tables
    /// Default: 256
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

impl ParseLimits {
    /// Create new limits with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Nesting depth tracking for a single parse
#[derive(Debug, Clone, Default)]
pub struct DepthCounter {
    depth: usize,
}

impl DepthCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a nested literal, returns error if depth exceeded
    pub fn push(&mut self, limits: &ParseLimits) -> Result<(), LimitExceeded> {
        // Check before incrementing so we don't leave invalid state on failure
        if self.depth >= limits.max_depth {
            return Err(LimitExceeded::MaxDepth(limits.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave a nested literal
    pub fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Error returned when a parser limit is exceeded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitExceeded {
    #[error("maximum nesting depth exceeded ({0})")]
    MaxDepth(usize),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ParseLimits::default();
        assert_eq!(limits.max_depth, 256);
    }

    #[test]
    fn test_builder_pattern() {
        let limits = ParseLimits::new().max_depth(8);
        assert_eq!(limits.max_depth, 8);
    }

    #[test]
    fn test_depth_counter() {
        let limits = ParseLimits::new().max_depth(2);
        let mut counter = DepthCounter::new();

        assert!(counter.push(&limits).is_ok());
        assert!(counter.push(&limits).is_ok());

        // 3rd level should fail
        assert!(matches!(
            counter.push(&limits),
            Err(LimitExceeded::MaxDepth(2))
        ));
        assert_eq!(counter.depth, 2);

        // Pop and try again
        counter.pop();
        assert!(counter.push(&limits).is_ok());
    }

    #[test]
    fn test_pop_at_zero() {
        let mut counter = DepthCounter::new();
        counter.pop();
        assert_eq!(counter.depth, 0);
    }
}
