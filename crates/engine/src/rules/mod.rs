//! Rule filtering, normalization, and matching.

pub mod matcher;
pub mod predicates;
pub mod validate;

pub use matcher::{RuleMatch, match_rule};
pub use validate::{ValidatedRule, validate_rules};
