//! Plausibility corrections applied to the chosen candidate.
//!
//! Each step takes and returns a [`Candidate`]. The order in [`curate`] is
//! significant: the swap steps rewrite the fields the later steps read.

use std::mem;

use tracing::debug;

use crate::models::tax::{Candidate, RateBounds};

/// Run every curation step in order.
pub fn curate(candidate: Candidate, bounds: RateBounds) -> Candidate {
    let candidate = trim_code(candidate);
    let candidate = scale_fractional_rate(candidate);
    let candidate = swap_out_of_bounds_rate(candidate, bounds);
    let candidate = swap_oversized_rate(candidate);
    let candidate = absolute_rate(candidate);
    let candidate = drop_implausible_rate(candidate);
    order_base_and_value(candidate)
}

/// Step 1: drop trailing whitespace and dots from the code.
pub fn trim_code(mut candidate: Candidate) -> Candidate {
    candidate.code = candidate
        .code
        .map(|code| {
            code.trim_end_matches(|c: char| c.is_whitespace() || c == '.')
                .trim_start()
                .to_string()
        })
        .filter(|code| !code.is_empty());
    candidate
}

/// Step 2: a rate in `(0, 1)` was written as a fraction.
pub fn scale_fractional_rate(mut candidate: Candidate) -> Candidate {
    if let Some(rate) = candidate.rate.filter(|r| *r > 0.0 && *r < 1.0) {
        candidate.rate = Some(rate * 100.0);
    }
    candidate
}

/// Step 3: an out-of-bounds rate trades places with an in-bounds base, or
/// failing that with an in-bounds value.
pub fn swap_out_of_bounds_rate(mut candidate: Candidate, bounds: RateBounds) -> Candidate {
    let Some(rate) = candidate.rate else {
        return candidate;
    };
    if bounds.contains(rate) {
        return candidate;
    }

    if candidate.base.is_some_and(|b| bounds.contains(b)) {
        debug!("Rate {} out of bounds, swapping with base", rate);
        mem::swap(&mut candidate.rate, &mut candidate.base);
    } else if candidate.value.is_some_and(|v| bounds.contains(v)) {
        debug!("Rate {} out of bounds, swapping with value", rate);
        mem::swap(&mut candidate.rate, &mut candidate.value);
    }
    candidate
}

/// Step 4: a rate above 100 trades places with a smaller base, or failing
/// that with a smaller value.
pub fn swap_oversized_rate(mut candidate: Candidate) -> Candidate {
    let Some(rate) = candidate.rate.filter(|r| *r > 100.0) else {
        return candidate;
    };

    if candidate.base.is_some_and(|b| rate > b) {
        mem::swap(&mut candidate.rate, &mut candidate.base);
    } else if candidate.value.is_some_and(|v| rate > v) {
        mem::swap(&mut candidate.rate, &mut candidate.value);
    }
    candidate
}

/// Step 5: rates are never negative.
pub fn absolute_rate(mut candidate: Candidate) -> Candidate {
    candidate.rate = candidate.rate.map(f64::abs);
    candidate
}

/// A rate still above 100 at this point cannot be corrected and is dropped.
pub fn drop_implausible_rate(mut candidate: Candidate) -> Candidate {
    if candidate.rate.is_some_and(|r| r > 100.0) {
        debug!("Dropping implausible rate {:?}", candidate.rate);
        candidate.rate = None;
    }
    candidate
}

/// Step 6: the base is the larger of base and value.
pub fn order_base_and_value(mut candidate: Candidate) -> Candidate {
    match (candidate.base, candidate.value) {
        (Some(base), Some(value)) if base < value => {
            candidate.base = Some(value);
            candidate.value = Some(base);
        }
        _ => {}
    }
    candidate
}
