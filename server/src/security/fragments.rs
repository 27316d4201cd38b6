//! Split a credential into labeled cookie fragments and put it back together.
//!
//! `fragment` and `reassemble` share one fixed permutation: label A holds the
//! second segment, B the first, C the third. Reassembly reads B, A, C. The
//! decoy label is emitted but never read.

use std::collections::HashMap;

use tollgate_shared::types::{DECOY_VALUE, FragmentSet, LABEL_A, LABEL_B, LABEL_C};

use crate::security::error::FragmentError;

const DELIMITER: char = '.';

/// Split `credential` into its fragment set.
pub fn fragment(credential: &str) -> Result<FragmentSet, FragmentError> {
    let segments: Vec<&str> = credential.split(DELIMITER).collect();
    let [s0, s1, s2] = segments.as_slice() else {
        return Err(FragmentError::SegmentCount(segments.len()));
    };

    Ok(FragmentSet {
        a: s1.to_string(),
        b: s0.to_string(),
        c: s2.to_string(),
        decoy: DECOY_VALUE.to_string(),
    })
}

/// Rebuild the credential from label → value pairs, as parsed from a cookie header.
pub fn reassemble(fragments: &HashMap<String, String>) -> Result<String, FragmentError> {
    let take = |label: &'static str| {
        fragments
            .get(label)
            .map(String::as_str)
            .ok_or(FragmentError::MissingFragment(label))
    };

    let b = take(LABEL_B)?;
    let a = take(LABEL_A)?;
    let c = take(LABEL_C)?;

    Ok(format!("{b}{DELIMITER}{a}{DELIMITER}{c}"))
}
