//! Bounded conversation window.
//!
//! Holds the most recent encoded exchange between the user and the model.
//! The window never exceeds the configured cap; older tokens are discarded
//! silently, keeping both memory use and generator input length bounded.

use crate::generator::TokenId;

/// Maximum tokens retained between turns, and the maximum total length
/// requested from the generator per turn.
pub const MAX_CONTEXT_TOKENS: usize = 1000;

/// The trailing slice of conversation tokens carried across turns.
#[derive(Clone, Debug, Default)]
pub struct ConversationWindow {
    tokens: Vec<TokenId>,
}

impl ConversationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    /// Build the generator input for a turn: prior context followed by the
    /// incoming tokens, or the incoming tokens alone when the window is
    /// empty.
    pub fn compose_input(&self, incoming: &[TokenId]) -> Vec<TokenId> {
        if self.tokens.is_empty() {
            return incoming.to_vec();
        }
        let mut input = Vec::with_capacity(self.tokens.len() + incoming.len());
        input.extend_from_slice(&self.tokens);
        input.extend_from_slice(incoming);
        input
    }

    /// Replace the window with the trailing `cap` tokens of `full`.
    pub fn retain_tail(&mut self, full: &[TokenId], cap: usize) {
        let start = full.len().saturating_sub(cap);
        self.tokens = full[start..].to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_empty() {
        let window = ConversationWindow::new();
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
    }

    #[test]
    fn test_compose_input_empty_window_returns_incoming() {
        let window = ConversationWindow::new();
        assert_eq!(window.compose_input(&[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_compose_input_concatenates() {
        let mut window = ConversationWindow::new();
        window.retain_tail(&[10, 11], MAX_CONTEXT_TOKENS);
        assert_eq!(window.compose_input(&[20, 21]), vec![10, 11, 20, 21]);
    }

    #[test]
    fn test_retain_tail_under_cap_keeps_everything() {
        let mut window = ConversationWindow::new();
        window.retain_tail(&[1, 2, 3], 10);
        assert_eq!(window.tokens(), &[1, 2, 3]);
    }

    #[test]
    fn test_retain_tail_over_cap_keeps_most_recent() {
        let mut window = ConversationWindow::new();
        let full: Vec<TokenId> = (0..1500).collect();
        window.retain_tail(&full, MAX_CONTEXT_TOKENS);

        assert_eq!(window.len(), MAX_CONTEXT_TOKENS);
        // Oldest tokens discarded first; the tail survives.
        assert_eq!(window.tokens()[0], 500);
        assert_eq!(*window.tokens().last().unwrap(), 1499);
    }

    #[test]
    fn test_retain_tail_repeated_turns_never_exceed_cap() {
        let mut window = ConversationWindow::new();
        for turn in 0..20 {
            let incoming: Vec<TokenId> = (0..200).map(|i| turn * 1000 + i).collect();
            let full = window.compose_input(&incoming);
            window.retain_tail(&full, MAX_CONTEXT_TOKENS);
            assert!(window.len() <= MAX_CONTEXT_TOKENS);
        }
        assert_eq!(window.len(), MAX_CONTEXT_TOKENS);
    }

    #[test]
    fn test_retain_tail_zero_cap_empties_window() {
        let mut window = ConversationWindow::new();
        window.retain_tail(&[1, 2, 3], 0);
        assert!(window.is_empty());
    }
}
