//! Domain models shared across the strategy pipeline.

pub mod params;

pub use params::{keys, ContractType, Numeric, ParameterMap, ParamsError, StrategyParams};
