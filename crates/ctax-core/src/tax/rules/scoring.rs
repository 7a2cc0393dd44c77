//! Choosing one candidate among several horizontal matches.

use tracing::{debug, trace};

use crate::models::tax::Candidate;

use super::matcher::NameMatcher;

/// Plausibility score of the candidate at `index` in the candidate list.
///
/// Later rows score higher; a rate adds 1 but loses 2 above 100 and a further
/// 1 above 30; a value adds 4 and a base adds 1.
pub fn score(candidate: &Candidate, index: usize) -> i32 {
    let mut score = index as i32 + 1;

    if let Some(rate) = candidate.rate {
        score += 1;
        if rate > 100.0 {
            score -= 2;
        }
        if rate > 30.0 {
            score -= 1;
        }
    }
    if candidate.value.is_some() {
        score += 4;
    }
    if candidate.base.is_some() {
        score += 1;
    }

    score
}

/// Pick the best candidate.
///
/// A lone candidate is returned as is. Otherwise candidates whose code is not
/// one of the tax names are dropped and the highest score wins, the earliest
/// one on ties.
pub fn pick_best(candidates: Vec<Candidate>, matcher: &NameMatcher) -> Option<Candidate> {
    if candidates.len() <= 1 {
        return candidates.into_iter().next();
    }

    let mut best: Option<(i32, Candidate)> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let known = candidate
            .code
            .as_deref()
            .is_some_and(|code| matcher.is_name(code));
        if !known {
            trace!("Dropping candidate {} with code {:?}", index, candidate.code);
            continue;
        }

        let score = score(&candidate, index);
        trace!("Candidate {} scored {}", index, score);

        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, candidate));
        }
    }

    if let Some((score, candidate)) = &best {
        debug!("Picked candidate {:?} with score {}", candidate.code, score);
    }

    best.map(|(_, candidate)| candidate)
}
