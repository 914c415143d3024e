//! Reconciliation of newly gathered records with the persisted dataset.
//!
//! Release entries are merged per date with same-game detection through an
//! [`AliasIndex`]; conflicts go to an injected [`ConflictResolver`].
//! Showcases and the translation table have their own simpler rules.

pub mod accumulate;
pub mod alias;
pub mod conflict;
pub mod error;
pub mod merge;
pub mod showcase;
pub mod translation;

pub use accumulate::ReleaseAccumulator;
pub use alias::AliasIndex;
pub use conflict::{
    Conflict, ConflictPolicy, ConflictResolver, FixedResolver, PolicyState, Resolution,
    ScriptedResolver,
};
pub use error::MergeError;
pub use merge::{MergeOutcome, MergeStats, fold_duplicates, merge_entries};
pub use showcase::{ShowcaseInsert, insert_showcase};
