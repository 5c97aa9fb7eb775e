//! Natural (numeric-aware) ordering of file names
//!
//! `"sesion2.html"` sorts before `"sesion10.html"` because digit runs are
//! compared by value rather than character by character.

use std::cmp::Ordering;

/// One run of a file name: either a digit run or a lowercased text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Digit run with leading zeros stripped, compared by numeric value
    Number(String),
    /// Lowercased non-digit run, compared lexicographically
    Text(String),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Digit runs can be longer than any integer type, so compare by
            // length first and then digit by digit.
            (Token::Number(a), Token::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            (Token::Number(_), Token::Text(_)) => Ordering::Less,
            (Token::Text(_), Token::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparison key for a file name
///
/// Keys compare token by token; a key that is a prefix of a longer one
/// sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SortKey(Vec<Token>);

impl SortKey {
    /// Split `name` into alternating digit and non-digit runs
    pub fn new(name: &str) -> Self {
        let mut tokens = Vec::new();
        let mut chars = name.chars().peekable();

        while let Some(&first) = chars.peek() {
            let digits = first.is_ascii_digit();
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() != digits {
                    break;
                }
                run.push(c);
                chars.next();
            }

            if digits {
                let trimmed = run.trim_start_matches('0');
                let value = if trimmed.is_empty() { "0" } else { trimmed };
                tokens.push(Token::Number(value.to_string()));
            } else {
                tokens.push(Token::Text(run.to_lowercase()));
            }
        }

        SortKey(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compare two names in natural order, falling back to the raw names when
/// their keys are equal (e.g. `"a01"` and `"a1"`) so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    SortKey::new(a).cmp(&SortKey::new(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn test_key_tokens() {
        let key = SortKey::new("Sesion10.html");
        assert_eq!(
            key.tokens(),
            &[
                Token::Text("sesion".to_string()),
                Token::Number("10".to_string()),
                Token::Text(".html".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_name_gives_empty_key() {
        assert!(SortKey::new("").is_empty());
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(
            sorted(&["sesion10.html", "sesion2.html", "sesion1.html"]),
            vec!["sesion1.html", "sesion2.html", "sesion10.html"]
        );
    }

    #[test]
    fn test_case_insensitive_text() {
        assert_eq!(natural_cmp("Apple", "banana"), Ordering::Less);
        assert_eq!(SortKey::new("ABC"), SortKey::new("abc"));
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert!(SortKey::new("part") < SortKey::new("part1"));
        assert!(SortKey::new("part1") < SortKey::new("part1b"));
    }

    #[test]
    fn test_leading_zeros_and_huge_numbers() {
        assert_eq!(SortKey::new("a007"), SortKey::new("a7"));
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Less);
        let nines = format!("x{}", "9".repeat(40));
        let power = format!("x1{}", "0".repeat(40));
        assert_eq!(natural_cmp(&nines, &power), Ordering::Less);
    }

    #[test]
    fn test_numbers_before_text() {
        assert_eq!(natural_cmp("1intro", "intro"), Ordering::Less);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sorted(&["b2", "a10", "a2", "B1", "a", "10", "2"]);
        let refs: Vec<&str> = once.iter().map(String::as_str).collect();
        let twice = sorted(&refs);
        assert_eq!(once, twice);
        assert_eq!(once, vec!["2", "10", "a", "a2", "a10", "B1", "b2"]);
    }
}
