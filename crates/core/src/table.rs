//! Tabular-content detection for section outlines.
//!
//! Bullet lists that are really label/value data ("Budget: $50,000") render
//! better as two-column tables. Detection is deliberately conservative: a
//! structural-pattern ratio alone is not enough, because ordinary prose
//! bullets often contain a colon; a corroborating financial/comparison cue
//! or a higher absolute match count is also required.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResult {
    pub is_table: bool,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

const MIN_ITEMS: usize = 3;
const SAMPLE_LIMIT: usize = 6;
const MATCH_RATIO_PCT: usize = 60;
const MIN_ABSOLUTE_MATCHES: usize = 3;
const STRONG_MATCH_COUNT: usize = 4;
/// Readability cap on emitted rows, header included.
pub const MAX_TABLE_ROWS: usize = 8;

const COMPARISON_VOCAB: &[&str] = &[
    "vs",
    "versus",
    "before",
    "after",
    "baseline",
    "quarter",
    "q1",
    "q2",
    "q3",
    "q4",
    "compared",
    "comparison",
    "growth",
    "decline",
];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const HEADER_VOCAB: &[(&str, [&str; 2])] = &[
    ("phase", ["Phase", "Description"]),
    ("budget", ["Item", "Amount"]),
    ("cost", ["Item", "Amount"]),
    ("metric", ["Metric", "Value"]),
    ("timeline", ["Activity", "Timeline"]),
    ("milestone", ["Milestone", "Date"]),
];

/// Decide whether `items` represent tabular data, and if so parse them into
/// a header pair plus two-cell rows. Fewer than three items never form a
/// table.
pub fn detect(items: &[String]) -> TableResult {
    if items.len() < MIN_ITEMS {
        return TableResult::default();
    }

    let sample_size = items.len().min(SAMPLE_LIMIT);
    let matches = items
        .iter()
        .take(SAMPLE_LIMIT)
        .filter(|item| matches_structural_pattern(item))
        .count();

    let ratio_met = matches * 100 >= sample_size * MATCH_RATIO_PCT;
    let corroborated = has_context_cue(items) || matches >= STRONG_MATCH_COUNT;

    if !(ratio_met && matches >= MIN_ABSOLUTE_MATCHES && corroborated) {
        return TableResult::default();
    }

    parse_table(items)
}

fn parse_table(items: &[String]) -> TableResult {
    let (headers, data_items) = match header_from_vocab(&items[0]) {
        Some(pair) => (pair, &items[1..]),
        None => (infer_headers(&items[0]), items),
    };

    let rows: Vec<Vec<String>> = data_items
        .iter()
        .take(MAX_TABLE_ROWS - 1)
        .map(|item| match item.split_once(':') {
            Some((label, value)) => vec![label.trim().to_string(), value.trim().to_string()],
            None => vec![item.trim().to_string(), String::new()],
        })
        .collect();

    TableResult {
        is_table: true,
        headers: headers.iter().map(|header| header.to_string()).collect(),
        rows,
    }
}

/// A colon-free first item carrying a known header word ("Phase", "Budget")
/// is a caption, not data; its vocabulary selects the header pair.
fn header_from_vocab(first: &str) -> Option<[&'static str; 2]> {
    if first.contains(':') {
        return None;
    }
    let lowered = first.to_lowercase();
    HEADER_VOCAB
        .iter()
        .find(|(word, _)| lowered.contains(word))
        .map(|(_, pair)| *pair)
}

/// Headers inferred from the shape of the first data item's value.
fn infer_headers(first: &str) -> [&'static str; 2] {
    let value = first.split_once(':').map(|(_, value)| value.trim()).unwrap_or("");
    let lowered = value.to_lowercase();

    if is_currency(value) {
        ["Item", "Amount"]
    } else if is_percentage(value) {
        ["Factor", "Percentage"]
    } else if MONTHS.iter().any(|month| lowered.contains(month))
        || lowered.contains("quarter")
        || ["q1", "q2", "q3", "q4"].iter().any(|quarter| contains_word(&lowered, quarter))
    {
        ["Activity", "Timeline"]
    } else {
        ["Item", "Details"]
    }
}

fn matches_structural_pattern(item: &str) -> bool {
    let Some((label, value)) = item.split_once(':') else {
        return false;
    };
    let label = label.trim();
    let value = value.trim();
    if label.is_empty() || value.is_empty() {
        return false;
    }

    is_currency(value) || is_percentage(value) || is_plain_number(value) || is_capitalized_label(label)
}

fn is_currency(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('$') else {
        return false;
    };
    let amount: &str = rest.split_whitespace().next().unwrap_or("");
    !amount.is_empty()
        && amount.chars().next().is_some_and(|c| c.is_ascii_digit())
        && amount
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | 'k' | 'K' | 'm' | 'M'))
}

fn is_percentage(value: &str) -> bool {
    let Some(first_token) = value.split_whitespace().next() else {
        return false;
    };
    first_token
        .strip_suffix('%')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.'))
}

fn is_plain_number(value: &str) -> bool {
    let Some(first_token) = value.split_whitespace().next() else {
        return false;
    };
    !first_token.is_empty()
        && first_token.chars().next().is_some_and(|c| c.is_ascii_digit())
        && first_token.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
}

fn is_capitalized_label(label: &str) -> bool {
    label.chars().next().is_some_and(char::is_uppercase)
        && label.split_whitespace().count() <= 5
}

/// Comparison vocabulary, or a currency/percent marker anywhere in the
/// items, corroborates that the colons mean data rather than prose.
fn has_context_cue(items: &[String]) -> bool {
    let joined = items.join(" ").to_lowercase();
    if joined.contains('$') || joined.contains('%') {
        return true;
    }
    COMPARISON_VOCAB.iter().any(|cue| contains_word(&joined, cue))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == needle)
}

#[cfg(test)]
mod tests {
    use super::{detect, MAX_TABLE_ROWS};

    fn items(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn budget_lines_form_a_table_with_amount_headers() {
        let result = detect(&items(&["Budget: $50,000", "Ops: $30,000", "Support: $20,000"]));

        assert!(result.is_table);
        assert_eq!(result.headers, vec!["Item", "Amount"]);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0], vec!["Budget", "$50,000"]);
    }

    #[test]
    fn colon_free_bullets_are_never_a_table() {
        let result = detect(&items(&[
            "Improve onboarding flow",
            "Reduce support load",
            "Ship the mobile app",
        ]));
        assert!(!result.is_table);
    }

    #[test]
    fn fewer_than_three_items_is_not_a_table() {
        assert!(!detect(&items(&["Budget: $50,000", "Ops: $30,000"])).is_table);
        assert!(!detect(&[]).is_table);
    }

    #[test]
    fn percentage_rows_get_factor_headers() {
        let result = detect(&items(&["Churn: 4%", "Expansion: 12%", "Adoption: 61%"]));
        assert!(result.is_table);
        assert_eq!(result.headers, vec!["Factor", "Percentage"]);
    }

    #[test]
    fn quarter_values_get_timeline_headers() {
        let result = detect(&items(&[
            "Discovery: Q1 2026",
            "Implementation: Q2 2026",
            "Rollout: Q3 2026",
        ]));
        assert!(result.is_table);
        assert_eq!(result.headers, vec!["Activity", "Timeline"]);
    }

    #[test]
    fn header_like_first_item_selects_vocabulary_pair() {
        let result = detect(&items(&[
            "Project phases",
            "Discovery: requirements and planning",
            "Build: development sprints",
            "Launch: rollout before Q3",
        ]));

        assert!(result.is_table);
        assert_eq!(result.headers, vec!["Phase", "Description"]);
        // caption consumed, three data rows remain
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0][0], "Discovery");
    }

    #[test]
    fn prose_bullets_with_one_colon_are_not_a_table() {
        // only two of four sampled items match, ratio gate fails
        let result = detect(&items(&[
            "Note: remember the offsite",
            "We should revisit pricing next month",
            "Goal: happier customers",
            "Everyone agreed on the plan",
        ]));
        assert!(!result.is_table);
    }

    #[test]
    fn capitalized_pairs_without_cues_need_four_matches() {
        // three generic label matches, no $/% or comparison vocabulary
        let three = detect(&items(&[
            "Alpha: first stage",
            "Beta: second stage",
            "Gamma: third stage",
        ]));
        assert!(!three.is_table);

        let four = detect(&items(&[
            "Alpha: first stage",
            "Beta: second stage",
            "Gamma: third stage",
            "Delta: fourth stage",
        ]));
        assert!(four.is_table);
    }

    #[test]
    fn comparison_vocabulary_corroborates_three_matches() {
        let result = detect(&items(&[
            "Before: 12 incidents",
            "After: 3 incidents",
            "Baseline: 14 incidents",
        ]));
        assert!(result.is_table);
    }

    #[test]
    fn colonless_rows_fill_the_first_cell() {
        let result = detect(&items(&[
            "Budget: $10k",
            "Ops: $5k",
            "Travel: $2k",
            "Unallocated reserve",
        ]));
        assert!(result.is_table);
        let last = result.rows.last().expect("row");
        assert_eq!(last[0], "Unallocated reserve");
        assert_eq!(last[1], "");
    }

    #[test]
    fn output_is_capped_at_eight_rows_including_header() {
        let many: Vec<String> = (0..12).map(|i| format!("Line {i}: ${i}00")).collect();
        let result = detect(&many);
        assert!(result.is_table);
        assert!(result.rows.len() <= MAX_TABLE_ROWS - 1);
    }

    #[test]
    fn rows_always_match_header_width() {
        let result = detect(&items(&[
            "Budget: $10k",
            "Ops: $5k",
            "Notes without colon",
            "Support: $2k",
        ]));
        for row in &result.rows {
            assert_eq!(row.len(), result.headers.len());
        }
    }
}
