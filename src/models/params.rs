//! # models::params
//!
//! Defines [`ParameterMap`] — the loosely-typed key/value bag that the
//! Extractor produces — and [`StrategyParams`], the typed view the Generator
//! consumes once the Validator has accepted the map.
//!
//! The map stays as raw JSON on purpose: values come from an LLM and may be
//! the wrong type (`"stake": "ten"`), which the Validator must be able to see.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

// ─── Keys & Defaults ──────────────────────────────────────────────────────────

pub mod keys {
    pub const DURATION:         &str = "duration";
    pub const STAKE:            &str = "stake";
    pub const INITIAL_STAKE:    &str = "initial_stake";
    pub const PROFIT_THRESHOLD: &str = "profit_threshold";
    pub const LOSS_THRESHOLD:   &str = "loss_threshold";
    pub const MARKET:           &str = "market";
    pub const SUBMARKET:        &str = "submarket";
    pub const SYMBOL:           &str = "symbol";
    pub const CONTRACT_TYPE:    &str = "contract_type";
}

/// Numeric keys with their default values (integers).
pub const NUMERIC_DEFAULTS: [(&str, i64); 5] = [
    (keys::DURATION,         1),
    (keys::STAKE,            1),
    (keys::INITIAL_STAKE,    1),
    (keys::PROFIT_THRESHOLD, 1000),
    (keys::LOSS_THRESHOLD,   500),
];

/// String keys with their default values.
pub const TEXT_DEFAULTS: [(&str, &str); 4] = [
    (keys::MARKET,        "synthetic_index"),
    (keys::SUBMARKET,     "random_index"),
    (keys::SYMBOL,        "1HZ10V"),
    (keys::CONTRACT_TYPE, "CALL"),
];

/// `true` if `key` is one of the parameters this system understands.
pub fn is_known_key(key: &str) -> bool {
    NUMERIC_DEFAULTS.iter().any(|(k, _)| *k == key) || TEXT_DEFAULTS.iter().any(|(k, _)| *k == key)
}

fn text_default(key: &str) -> &'static str {
    TEXT_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or_default()
}

// ─── Numeric ──────────────────────────────────────────────────────────────────

/// A number as the caller wrote it.
///
/// Integers stay integers and floats keep their JSON spelling, so `5` renders
/// as `5` and `10.0` renders as `10.0`. No rounding, no currency formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Reads a JSON value as a number. Strings, booleans and nulls are `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            Some(Numeric::Int(i))
        } else {
            n.as_f64().map(Numeric::Float)
        }
    }

    /// Arithmetic negation. `i64::MIN` has no integer negation and is widened.
    pub fn negate(self) -> Self {
        match self {
            Numeric::Int(i) => i
                .checked_neg()
                .map(Numeric::Int)
                .unwrap_or(Numeric::Float(-(i as f64))),
            Numeric::Float(f) => Numeric::Float(-f),
        }
    }

    pub fn to_json(self) -> Value {
        match self {
            Numeric::Int(i) => Value::from(i),
            Numeric::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(i) => write!(f, "{i}"),
            // serde_json keeps the trailing ".0" on whole floats
            Numeric::Float(x) => match Number::from_f64(*x) {
                Some(n) => write!(f, "{n}"),
                None => write!(f, "{x}"),
            },
        }
    }
}

// ─── ParameterMap ─────────────────────────────────────────────────────────────

/// Strategy parameters as extracted — raw JSON values keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMap(Map<String, Value>);

impl ParameterMap {
    /// An empty map (no defaults). Mostly useful for tests of the Validator.
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// The hard-coded defaults every extraction starts from.
    pub fn defaults() -> Self {
        let mut map = Map::new();
        for (key, value) in NUMERIC_DEFAULTS {
            map.insert(key.to_string(), Value::from(value));
        }
        for (key, value) in TEXT_DEFAULTS {
            map.insert(key.to_string(), Value::from(value));
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Numeric value of `key`, if present and a JSON number.
    pub fn numeric(&self, key: &str) -> Option<Numeric> {
        self.0.get(key).and_then(Numeric::from_json)
    }

    /// String value of `key`, if present and a JSON string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Shallow merge: every recognised, non-null key in `extracted` replaces
    /// the current value. Unknown keys are dropped. Returns how many keys were
    /// applied.
    pub fn merge(&mut self, extracted: Map<String, Value>) -> usize {
        let mut applied = 0;
        for (key, value) in extracted {
            if !is_known_key(&key) {
                debug!(key = %key, "Ignoring unrecognised parameter");
                continue;
            }
            if value.is_null() {
                continue;
            }
            self.0.insert(key, value);
            applied += 1;
        }
        applied
    }
}

impl Default for ParameterMap {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Map<String, Value>> for ParameterMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ─── StrategyParams ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("missing required parameter '{0}'")]
    Missing(&'static str),

    #[error("parameter '{0}' must be a number")]
    NotNumeric(&'static str),
}

/// Contract direction for the `purchase` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContractType {
    #[default]
    Call,
    Put,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Call => "CALL",
            ContractType::Put => "PUT",
        }
    }

    /// Case-insensitive parse; "rise"/"fall" are the editor's display names.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "CALL" | "RISE" => Some(ContractType::Call),
            "PUT" | "FALL" => Some(ContractType::Put),
            _ => None,
        }
    }
}

/// Typed parameters handed to the Generator.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    /// Contract length in ticks.
    pub duration:         Numeric,
    pub stake:            Numeric,
    pub initial_stake:    Numeric,
    pub profit_threshold: Numeric,
    /// Stop-loss magnitude; the after-purchase bound is its negation.
    pub loss_threshold:   Numeric,
    pub market:           String,
    pub submarket:        String,
    pub symbol:           String,
    pub contract_type:    ContractType,
}

impl StrategyParams {
    /// Builds typed params from a map. Numeric keys are mandatory; string keys
    /// fall back to their defaults when absent or not strings.
    pub fn from_map(map: &ParameterMap) -> Result<Self, ParamsError> {
        let number = |key: &'static str| -> Result<Numeric, ParamsError> {
            let value = map.get(key).ok_or(ParamsError::Missing(key))?;
            Numeric::from_json(value).ok_or(ParamsError::NotNumeric(key))
        };
        let text = |key: &'static str| -> String {
            match map.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    warn!(key, value = %other, "Non-string value, using default");
                    text_default(key).to_string()
                }
                None => text_default(key).to_string(),
            }
        };

        let contract_type = match map.text(keys::CONTRACT_TYPE) {
            Some(raw) => ContractType::parse(raw).unwrap_or_else(|| {
                warn!(contract_type = raw, "Unknown contract type, using CALL");
                ContractType::Call
            }),
            None => ContractType::Call,
        };

        Ok(Self {
            duration:         number(keys::DURATION)?,
            stake:            number(keys::STAKE)?,
            initial_stake:    number(keys::INITIAL_STAKE)?,
            profit_threshold: number(keys::PROFIT_THRESHOLD)?,
            loss_threshold:   number(keys::LOSS_THRESHOLD)?,
            market:           text(keys::MARKET),
            submarket:        text(keys::SUBMARKET),
            symbol:           text(keys::SYMBOL),
            contract_type,
        })
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            duration:         Numeric::Int(1),
            stake:            Numeric::Int(1),
            initial_stake:    Numeric::Int(1),
            profit_threshold: Numeric::Int(1000),
            loss_threshold:   Numeric::Int(500),
            market:           text_default(keys::MARKET).to_string(),
            submarket:        text_default(keys::SUBMARKET).to_string(),
            symbol:           text_default(keys::SYMBOL).to_string(),
            contract_type:    ContractType::Call,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let map = ParameterMap::defaults();
        assert_eq!(map.numeric(keys::DURATION), Some(Numeric::Int(1)));
        assert_eq!(map.numeric(keys::PROFIT_THRESHOLD), Some(Numeric::Int(1000)));
        assert_eq!(map.numeric(keys::LOSS_THRESHOLD), Some(Numeric::Int(500)));
        assert_eq!(map.text(keys::SYMBOL), Some("1HZ10V"));
        assert_eq!(map.text(keys::MARKET), Some("synthetic_index"));
    }

    #[test]
    fn test_merge_overrides_key_by_key() {
        let mut map = ParameterMap::defaults();
        let applied = map.merge(object(json!({ "stake": 10, "loss_threshold": 50 })));
        assert_eq!(applied, 2);
        assert_eq!(map.numeric(keys::STAKE), Some(Numeric::Int(10)));
        assert_eq!(map.numeric(keys::LOSS_THRESHOLD), Some(Numeric::Int(50)));
        // untouched keys keep their defaults
        assert_eq!(map.numeric(keys::DURATION), Some(Numeric::Int(1)));
    }

    #[test]
    fn test_merge_skips_unknown_and_null() {
        let mut map = ParameterMap::defaults();
        let applied = map.merge(object(json!({ "leverage": 100, "stake": null })));
        assert_eq!(applied, 0);
        assert!(map.get("leverage").is_none());
        assert_eq!(map.numeric(keys::STAKE), Some(Numeric::Int(1)));
    }

    #[test]
    fn test_numeric_keeps_literal_spelling() {
        assert_eq!(Numeric::Int(5).to_string(), "5");
        assert_eq!(Numeric::Float(10.5).to_string(), "10.5");
        assert_eq!(Numeric::Float(10.0).to_string(), "10.0");
    }

    #[test]
    fn test_negate_never_double_negates() {
        assert_eq!(Numeric::Int(50).negate().to_string(), "-50");
        assert_eq!(Numeric::Int(-50).negate().to_string(), "50");
        assert_eq!(Numeric::Float(2.5).negate().to_string(), "-2.5");
    }

    #[test]
    fn test_from_json_rejects_non_numbers() {
        assert_eq!(Numeric::from_json(&json!("ten")), None);
        assert_eq!(Numeric::from_json(&json!(true)), None);
        assert_eq!(Numeric::from_json(&json!(null)), None);
        assert_eq!(Numeric::from_json(&json!(7)), Some(Numeric::Int(7)));
    }

    #[test]
    fn test_strategy_params_from_map() {
        let mut map = ParameterMap::defaults();
        map.merge(object(json!({ "duration": 5, "symbol": "R_100", "contract_type": "put" })));
        let params = StrategyParams::from_map(&map).unwrap();
        assert_eq!(params.duration, Numeric::Int(5));
        assert_eq!(params.symbol, "R_100");
        assert_eq!(params.contract_type, ContractType::Put);
        assert_eq!(params.market, "synthetic_index");
    }

    #[test]
    fn test_strategy_params_reports_bad_key() {
        let mut map = ParameterMap::defaults();
        map.insert(keys::STAKE, json!("ten"));
        assert_eq!(StrategyParams::from_map(&map), Err(ParamsError::NotNumeric("stake")));

        map.remove(keys::DURATION);
        assert_eq!(StrategyParams::from_map(&map), Err(ParamsError::Missing("duration")));
    }

    #[test]
    fn test_default_params_agree_with_default_map() {
        let params = StrategyParams::from_map(&ParameterMap::defaults()).unwrap();
        assert_eq!(params, StrategyParams::default());
    }
}
