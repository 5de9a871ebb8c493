// KSH chart format: structural parser, stringifier and conversion to KSON

pub mod ast;
mod config;
mod convert;
mod error;
pub mod lane;
mod parse;
pub mod pulse;
mod stringify;

pub use ast::{ChartLine, Definition, Ksh, Line, Measure};
pub use config::{ConverterConfig, LegacyVolumePolicy};
pub use convert::{KshDecoder, ksh_to_kson, ksh_to_kson_with_config};
pub use error::KshError;
pub use parse::{parse_ksh, parse_line};
pub use stringify::{stringify_ksh, stringify_line};
