//! Approximate string similarity.
//!
//! Scores follow the Ratcliff/Obershelp "gestalt pattern matching" ratio:
//! find the longest common block, recurse on the unmatched text to its left
//! and right, and report `2 * M / T` where `M` is the number of matched
//! characters and `T` the combined length of both strings. This is the score
//! ordinary fuzzy-matching libraries report, so thresholds tuned against
//! them carry over.
//!
//! Comparison is per Unicode scalar value: "é" and "e" are different
//! characters, but the rest of the name still aligns.

use std::collections::HashMap;

/// Similarity of two strings in `[0, 1]`.
///
/// Two empty strings are identical (1.0). A non-empty string compared with
/// an empty one scores 0.0.
///
/// # Examples
///
/// ```
/// use ratp_server::similarity::similarity;
///
/// assert_eq!(similarity("Nation", "Nation"), 1.0);
/// assert_eq!(similarity("abc", "xyz"), 0.0);
/// assert!(similarity("Chatelet", "Châtelet") > 0.8);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Total length of the matching blocks found by recursive longest-match.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    // Positions of each character in `b`, ascending.
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }

        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, k)` such that `a[i..i+k] == b[j..j+k]`. Among maximal
/// blocks, the one starting earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);

    // Length of the block ending at (i - 1, j), keyed by j.
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();

        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }

                let previous = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0)
                } else {
                    0
                };
                let k = previous + 1;
                next_j2len.insert(j, k);

                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }

        j2len = next_j2len;
    }

    (best_i, best_j, best_k)
}
