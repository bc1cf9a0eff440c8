//! HMAC tag authentication with a deliberate timing side channel.
//!
//! Tags are compared one byte at a time with a delay after every matching
//! byte, so response latency reveals how much of a guessed tag is correct.
mod attack;
mod auth;
mod compare;
mod config;
mod error;
mod logging;
mod params;
mod server;
mod tag;

pub use attack::{recover_tag, AttackTarget};
pub use auth::Authenticator;
pub use compare::{constant_time_compare, insecure_compare};
pub use config::{AttackConfig, Limits, ServerConfig};
pub use error::{AttackError, AuthError, ConfigError, ValidationError};
pub use logging::init as init_logging;
pub use params::{parse_delay, parse_tag, parse_user, RequestParameters};
pub use server::{router, serve, spawn_server, AUTH_PATH};
pub use tag::{compute_tag, derive_key, HmacSha256, TAG_MAX_LEN};
