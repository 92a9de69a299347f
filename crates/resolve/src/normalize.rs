//! Canonical forms for identifiers and title/author text, plus the
//! sequence-similarity ratio the fuzzy tier scores with.

use std::collections::HashMap;

/// Reduce a raw ISBN field to its digits.
///
/// Handles hyphens, spaces, and the Excel guard Goodreads wraps ISBN cells
/// in (`="0441013597"`). Length is not validated — only digit content
/// matters for index lookup.
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Reduce a title or author to a canonical comparable spelling.
///
/// Lowercase; drop a trailing bracketed segment and everything after it
/// (series/edition annotations like `(Dune #1)`); drop a `:`-delimited
/// subtitle; strip punctuation, keeping alphanumerics and whitespace;
/// collapse whitespace runs. Idempotent. Returns None when nothing
/// comparable remains.
pub fn normalize_text(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();

    let cut = match lower.find(|c| c == '(' || c == '[') {
        Some(i) => &lower[..i],
        None => lower.as_str(),
    };
    let cut = match cut.find(':') {
        Some(i) => &cut[..i],
        None => cut,
    };

    let stripped: String = cut
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Character-sequence similarity ratio in [0, 1].
///
/// Ratcliff/Obershelp matching: recursively find the longest common block,
/// then match the pieces to its left and right. The ratio is `2·M / T`
/// where M is the total matched length and T the sum of both lengths.
/// The tier-3 thresholds were tuned against this exact ratio — do not
/// swap in an edit-distance approximation.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }

    let matched = matching_chars(&a, &b2j, 0, a.len(), 0, b.len());
    (2.0 * matched as f64) / total as f64
}

/// Total length of matching blocks between `a[alo..ahi]` and `b[blo..bhi]`.
fn matching_chars(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> usize {
    let (i, j, size) = longest_match(a, b2j, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matching_chars(a, b2j, alo, i, blo, j)
        + matching_chars(a, b2j, i + size, ahi, j + size, bhi)
}

/// Longest block where `a[i..i+size] == b[j..j+size]` within the given
/// bounds. Ties break toward the earliest position in `a`, then `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j2len[j] = length of the common block ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = b2j.get(&a[i]) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let size = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}
