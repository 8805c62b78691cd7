//! Token-sort string similarity on a 0-100 scale

/// Lowercase, turn every non-alphanumeric character into a space, then sort
/// the whitespace separated tokens and rejoin them with single spaces
pub fn sorted_tokens(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two names regardless of word order
///
/// Both inputs go through [`sorted_tokens`]; the score is
/// `100 * 2 * lcs / (len_a + len_b)` rounded to the nearest integer, where
/// `lcs` is the longest common subsequence in characters. An empty side
/// scores 0.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = sorted_tokens(a).chars().collect();
    let b: Vec<char> = sorted_tokens(b).chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let total = a.len() + b.len();
    let matched = 2 * lcs_len(&a, &b);
    ((200 * matched + total) / (2 * total)) as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
