use tagleak::{init_logging, recover_tag, AttackConfig, AttackError, AttackTarget};

use clap::Parser;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AttackConfig::parse();
    init_logging(None)?;

    let target = AttackTarget {
        address: config.url,
        delay: config.delay,
        user: config.user,
        tag_len: config.tag_len,
    };
    info!(
        "attacking {} as {:?} with {}ms per byte",
        target.address, target.user, target.delay
    );

    match recover_tag(&target, config.workers, config.rounds).await {
        Ok(tag) => {
            println!("{}", hex::encode(tag));
            Ok(())
        }
        Err(AttackError::Exhausted { best_guess }) => {
            warn!("server rejected every guess");
            println!("{}", hex::encode(&best_guess));
            Err(AttackError::Exhausted { best_guess }.into())
        }
        Err(e) => Err(e.into()),
    }
}
