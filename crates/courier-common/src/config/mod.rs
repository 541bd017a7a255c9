//! Configuration loading

pub mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    MessagingConfig, RateLimitConfig, RedisConfig, ServerConfig, SnowflakeConfig,
};
