//! # engine::rules
//!
//! Keyword scan used when no LLM is configured or the LLM call fails.
//!
//! This is a heuristic, not a parser. It pairs each keyword with the nearest
//! unclaimed number and will misread ambiguous prompts.
//!
//! ```text
//! "5 ticks, $10 stake, profit of $100 and loss of $50"
//!  ▲ ◀──┘   ▲◀───┘      └──▶ ▲          └──▶ ▲
//!  duration stake            profit          loss
//! ```
//!
//! * money keywords (`stake`, `profit`, `loss`) look forward first, then back
//! * `tick` looks back first and only takes plain integers (no `$`)
//! * a scan never walks past another keyword, and each number is used once

use serde_json::Map;
use tracing::debug;

use crate::models::{keys, Numeric, ParameterMap};

/// How far (in tokens) a keyword may reach for its number.
const WINDOW: usize = 3;

const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Duration,
    Stake,
    Profit,
    Loss,
}

impl Field {
    fn classify(word: &str) -> Option<Self> {
        match word {
            "tick" | "ticks" => Some(Field::Duration),
            "stake" | "stakes" => Some(Field::Stake),
            "profit" | "profits" | "takeprofit" => Some(Field::Profit),
            "loss" | "losses" | "stoploss" => Some(Field::Loss),
            _ => None,
        }
    }

    fn keys(&self) -> &'static [&'static str] {
        match self {
            Field::Duration => &[keys::DURATION],
            Field::Stake => &[keys::STAKE, keys::INITIAL_STAKE],
            Field::Profit => &[keys::PROFIT_THRESHOLD],
            Field::Loss => &[keys::LOSS_THRESHOLD],
        }
    }

    fn accepts(&self, number: &NumberToken) -> bool {
        match self {
            Field::Duration => !number.currency && matches!(number.value, Numeric::Int(n) if n > 0),
            _ => true,
        }
    }

    fn search_order(&self) -> [Direction; 2] {
        match self {
            Field::Duration => [Direction::Backward, Direction::Forward],
            _ => [Direction::Forward, Direction::Backward],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NumberToken {
    value:    Numeric,
    currency: bool,
}

#[derive(Debug)]
struct Token {
    keyword: Option<Field>,
    number:  Option<NumberToken>,
}

impl Token {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_matches(|c: char| {
            !(c.is_alphanumeric() || CURRENCY_SYMBOLS.contains(&c))
        });
        let word = trimmed.to_lowercase();

        Self {
            keyword: Field::classify(&word),
            number:  parse_number(trimmed),
        }
    }
}

/// `"$10"`, `"10"`, `"2.5"`, `"1,000"`, `"10$"` → number. Anything else → `None`.
fn parse_number(text: &str) -> Option<NumberToken> {
    let (currency, body) = match text.strip_prefix(CURRENCY_SYMBOLS) {
        Some(rest) => (true, rest),
        None => match text.strip_suffix(CURRENCY_SYMBOLS) {
            Some(rest) => (true, rest),
            None => (false, text),
        },
    };

    let digits: String = body.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = if digits.contains('.') {
        Numeric::Float(digits.parse().ok()?)
    } else {
        Numeric::Int(digits.parse().ok()?)
    };

    Some(NumberToken { value, currency })
}

fn nearest(
    tokens: &[Token],
    claimed: &[bool],
    from: usize,
    direction: Direction,
    field: Field,
) -> Option<usize> {
    for step in 1..=WINDOW {
        let index = match direction {
            Direction::Forward => from + step,
            Direction::Backward => from.checked_sub(step)?,
        };
        let token = tokens.get(index)?;
        // ห้ามข้าม keyword อื่น
        if token.keyword.is_some() {
            return None;
        }
        if claimed[index] {
            continue;
        }
        if let Some(number) = &token.number {
            if field.accepts(number) {
                return Some(index);
            }
        }
    }
    None
}

/// Scan `prompt` and merge whatever is found over the defaults.
pub fn scan(prompt: &str) -> ParameterMap {
    let tokens: Vec<Token> = prompt
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/')
        .filter(|t| !t.is_empty())
        .map(Token::parse)
        .collect();

    // ตัวเลขแต่ละตัวถูกจับคู่ได้ครั้งเดียว
    let mut claimed = vec![false; tokens.len()];
    let mut found = Map::new();

    for (i, token) in tokens.iter().enumerate() {
        let Some(field) = token.keyword else { continue };
        // เจอ keyword ซ้ำ ใช้ตัวแรกเท่านั้น
        if field.keys().iter().any(|k| found.contains_key(*k)) {
            continue;
        }

        let hit = field
            .search_order()
            .into_iter()
            .find_map(|dir| nearest(&tokens, &claimed, i, dir, field));

        if let Some(j) = hit {
            claimed[j] = true;
            if let Some(number) = tokens[j].number {
                for key in field.keys() {
                    found.insert(key.to_string(), number.value.to_json());
                }
            }
        }
    }

    debug!(found = ?found, "Keyword scan finished");

    let mut params = ParameterMap::defaults();
    params.merge(found);
    params
}

// ─── Tests ────────────────────────────────────────────────────────────────────
