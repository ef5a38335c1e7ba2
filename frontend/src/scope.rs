//! Generation counters that tie async responses to the view that asked for them.

/// Identifies the view a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeToken(u64);

/// Each call to [`ViewScope::renew`] invalidates every token handed out
/// before it, so late responses for a view the user already left are dropped.
#[derive(Debug, Default)]
pub struct ViewScope {
    generation: u64,
}

impl ViewScope {
    pub fn current(&self) -> ScopeToken {
        ScopeToken(self.generation)
    }

    pub fn renew(&mut self) -> ScopeToken {
        self.generation = self.generation.wrapping_add(1);
        self.current()
    }

    pub fn is_current(&self, token: ScopeToken) -> bool {
        token.0 == self.generation
    }
}
