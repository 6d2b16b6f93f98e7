// src/engine/mod.rs

//! Build decision engine.
//!
//! The pure fold lives in [`decision`]; [`decide_range`] is the convenience
//! entry point that pulls revisions from a provider first.

pub mod decision;

pub use decision::{decide, BuildDecision, QualifiedRevision};

use crate::criteria::Criteria;
use crate::errors::Result;
use crate::revision::{revisions, RevisionProvider, RevisionRange};
use crate::watermark::WatermarkStore;

/// Enumerate `range` from `provider` and fold it into a decision.
pub fn decide_range<P>(
    criteria: &Criteria,
    provider: &P,
    range: &RevisionRange,
    store: &dyn WatermarkStore,
) -> Result<BuildDecision>
where
    P: RevisionProvider + ?Sized,
{
    let stream = revisions(provider, range)?;
    decide(criteria, stream, store)
}
