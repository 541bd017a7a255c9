//! Value objects - immutable domain primitives

pub mod page;
pub mod snowflake;

pub use page::{Page, PageRequest};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
