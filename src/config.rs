use crate::{error::ConfigError, TAG_MAX_LEN};

use clap::Parser;

use std::path::PathBuf;

/// Bounds applied to every request, fixed for the lifetime of the process.
/// Only built through [`Limits::new`], so `tag_len` always fits a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_delay: u64,
    max_user: usize,
    tag_len: usize,
}

impl Limits {
    pub fn new(max_delay: u64, max_user: usize, tag_len: usize) -> Result<Self, ConfigError> {
        if max_delay == 0 {
            return Err(ConfigError::MaxDelay);
        }
        if max_user == 0 {
            return Err(ConfigError::MaxUser);
        }
        if tag_len == 0 || tag_len > TAG_MAX_LEN {
            return Err(ConfigError::TagLength {
                max: TAG_MAX_LEN,
                got: tag_len,
            });
        }
        Ok(Self {
            max_delay,
            max_user,
            tag_len,
        })
    }

    /// Largest accepted per-byte delay, in milliseconds.
    pub fn max_delay(&self) -> u64 {
        self.max_delay
    }

    /// Largest accepted user identifier, in bytes.
    pub fn max_user(&self) -> usize {
        self.max_user
    }

    pub fn tag_len(&self) -> usize {
        self.tag_len
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_delay: 1000,
            max_user: 8,
            tag_len: 4,
        }
    }
}

/// Serve HMAC tag authentication with a deliberate per-byte timing leak.
#[derive(Parser, Debug, Clone)]
#[command(name = "tagleak-server", version)]
pub struct ServerConfig {
    /// Server ip address
    #[arg(long, default_value = "localhost")]
    pub ip: String,

    /// Server port to listen on
    #[arg(long, default_value_t = 20000)]
    pub port: u16,

    /// Largest delay in loop compare (ms)
    #[arg(long, default_value_t = 1000)]
    pub max_delay: u64,

    /// Largest size of a user name
    #[arg(long, default_value_t = 8)]
    pub max_user: usize,

    /// Number of bytes in a tag
    #[arg(long, default_value_t = 4)]
    pub tag_len: usize,

    /// Secret used to produce tags
    #[arg(long, default_value = "secret")]
    pub secret: String,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn limits(&self) -> Result<Limits, ConfigError> {
        Limits::new(self.max_delay, self.max_user, self.tag_len)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Recover a tag from a running tagleak server by timing its responses.
#[derive(Parser, Debug, Clone)]
#[command(name = "tagleak-attack", version)]
pub struct AttackConfig {
    /// Base url of the server
    #[arg(long, default_value = "http://localhost:20000")]
    pub url: String,

    /// Per-byte delay to request (ms)
    #[arg(long, default_value_t = 50)]
    pub delay: u64,

    /// User to forge a tag for
    #[arg(long, default_value = "alice")]
    pub user: String,

    /// Number of bytes in a tag
    #[arg(long, default_value_t = 4)]
    pub tag_len: usize,

    /// Requests per candidate byte
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,

    /// Candidate bytes requested concurrently
    #[arg(long, default_value_t = 8)]
    pub workers: usize,
}
