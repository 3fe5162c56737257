pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, GeneralConfig, LoggingConfig,
    RoutingConfig, SameSite, SessionConfig,
};
pub use envconfig::EnvConfig;
