//! MDL-driven target compression ratio (C3, §4.4). Pure, no I/O.

use std::collections::HashMap;

/// Shannon entropy of `bytes`, in bits per byte.
fn shannon_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in bytes {
        counts[b as usize] += 1;
    }
    let len = bytes.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// `1 - unique_words / total_words`: how redundant the vocabulary is.
fn redundancy_ratio(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let mut seen: HashMap<&str, ()> = HashMap::new();
    for w in &words {
        seen.insert(*w, ());
    }
    1.0 - (seen.len() as f64 / words.len() as f64)
}

/// Bonus for structural markers that tend to survive summarisation poorly
/// if over-compressed (code fences, lists, headers). Capped at 1.0.
fn structure_bonus(text: &str) -> f64 {
    let mut bonus = 0.0;
    if text.contains("```") {
        bonus += 0.3;
    }
    if text.lines().any(|l| {
        let t = l.trim_start();
        t.starts_with("- ") || t.starts_with("* ")
    }) {
        bonus += 0.2;
    }
    if text.lines().any(|l| {
        let t = l.trim_start();
        t.split_once('.').is_some_and(|(head, rest)| {
            !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) && rest.starts_with(' ')
        })
    }) {
        bonus += 0.2;
    }
    if text.lines().any(|l| l.trim_start().starts_with('#')) {
        bonus += 0.3;
    }
    bonus.min(1.0)
}

/// Target compression ratio for `text`, clamped to `[0.2, 0.8]` (§4.4).
pub fn target_compression_ratio(text: &str) -> f64 {
    let entropy = shannon_entropy(text.as_bytes());
    let redundancy = redundancy_ratio(text);
    let structure = structure_bonus(text);

    let raw = 0.3 + (entropy - 3.5) * 0.05 - (redundancy - 0.5) * 0.1 + structure * 0.1;
    raw.clamp(0.2, 0.8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_stays_within_clamp_bounds() {
        assert!(target_compression_ratio("").is_finite());
        let ratio = target_compression_ratio("the the the the the the the the");
        assert!((0.2..=0.8).contains(&ratio));
    }

    #[test]
    fn structured_text_scores_a_higher_target_ratio() {
        let plain = "a plain paragraph with no structure at all here";
        let structured = "# Heading\n- item one\n- item two\n```\ncode\n```\n";
        assert!(target_compression_ratio(structured) >= target_compression_ratio(plain));
    }

    #[test]
    fn repetitive_text_lowers_the_target_ratio_relative_to_varied_text() {
        let repetitive = "alpha alpha alpha alpha alpha alpha alpha alpha";
        let varied = "alpha beta gamma delta epsilon zeta eta theta";
        assert!(target_compression_ratio(repetitive) <= target_compression_ratio(varied));
    }
}
