//! Property-based tests for determinism and content guarantees
