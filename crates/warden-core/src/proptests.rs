//! Property-based tests for rules and the evaluator.
