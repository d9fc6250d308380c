//! Property-based testing for sampling invariants
//!
//! Exercises the estimator and rollforward planner across generated inputs
//! rather than hand-picked scenarios.

mod sampling_invariants;
