//! Access key comparison.

use subtle::ConstantTimeEq;

/// Constant-time string equality.
///
/// Runs in time dependent only on the longer input's length.
pub fn keys_match(candidate: &str, expected: &str) -> bool {
    let max_len = candidate.len().max(expected.len());

    // Different pad bytes guarantee a mismatch when lengths differ.
    let mut a = vec![0u8; max_len];
    let mut b = vec![0xFFu8; max_len];
    a[..candidate.len()].copy_from_slice(candidate.as_bytes());
    b[..expected.len()].copy_from_slice(expected.as_bytes());

    let lengths_equal = candidate.len().ct_eq(&expected.len());
    let contents_equal = a.ct_eq(&b);

    (lengths_equal & contents_equal).into()
}
