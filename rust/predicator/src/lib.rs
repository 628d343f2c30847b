//! Predicator
//!
//! A small logic-programming resolution engine. Goals are unified against
//! the conditions of rules, bindings are threaded through rule bodies, and
//! every way a goal can be satisfied is produced lazily as a stream of
//! [`Knowns`] environments.
//!
//! ```text
//! Term ──expand──▶ PlainTerm ──▶ RulePattern ──match──▶ Rule ──▶ Predicate
//!                                     ▲                              │
//!                              RuleSelector ◀──── resolve ───────────┘
//! ```
//!
//! The engine keeps no global state: identifiers for temporaries are issued
//! from a counter carried by [`Knowns`], and rule sets are immutable
//! snapshots.

mod error;
pub use error::*;

mod stream;
pub use stream::*;

mod term;
pub use term::*;

mod knowns;
pub use knowns::*;

mod pattern;
pub use pattern::*;

mod rule;
pub use rule::*;

mod selector;
pub use selector::*;

mod predicate;
pub use predicate::*;

#[cfg(any(test, feature = "helpers"))]
pub mod helpers;
