pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_ACCESS_COOKIE: &str = "sr-access-token";
pub const DEFAULT_REFRESH_COOKIE: &str = "sr-refresh-token";
pub const DEFAULT_LOCALE_COOKIE: &str = "NEXT_LOCALE";
pub const DEFAULT_COOKIE_SECURE: bool = true;

pub const DEFAULT_LOCALES: &[&str] = &["en", "fr"];
pub const DEFAULT_LOCALE: &str = "en";

pub const DEFAULT_CACHE_STALE_AFTER_SECS: u64 = 5 * 60;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_CACHE_FETCH_ATTEMPTS: u32 = 3;
