//! Lookup-method selection
//!
//! Decides how an existing remote resource is located from the identifying
//! inputs at hand: a direct fetch by id, by name, by compound key, or a full
//! collection listing that is filtered locally.
//!
//! The decision itself is [`select_method`], a pure first-match-or-default
//! rule over boolean presence vectors. [`LookupPlan`] builds those vectors
//! for a resource kind.

mod types;

pub use types::{LookupMethod, LookupPlan};

/// Pick a lookup method from presence vectors given in priority order.
///
/// Returns the index of the first candidate with at least one `true`
/// entry. When every candidate is all-false (or there are none) the
/// default, candidate `0`, is returned. Earlier candidates always win over
/// later ones, so id must be declared before name.
pub fn select_method<V: AsRef<[bool]>>(candidates: &[V]) -> usize {
    candidates
        .iter()
        .position(|candidate| candidate.as_ref().iter().any(|present| *present))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests;
