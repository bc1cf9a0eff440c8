//! Recover a tag from a running server by timing its responses.
//!
//! Each correct leading byte adds one delay step to the response time, so
//! the tag can be found one byte at a time: for each position, the
//! candidate that takes longest to be rejected is most likely correct.

use crate::error::AttackError;

use futures::future::join_all;
use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

use std::time::Instant;

const TRIM_PERCENT: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct AttackTarget {
    pub address: String,
    pub delay: u64,
    pub user: String,
    pub tag_len: usize,
}

impl AttackTarget {
    fn url(&self, tag: &[u8]) -> Result<Url, AttackError> {
        let mut url =
            Url::parse(&self.address).map_err(|e| AttackError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AttackError::InvalidUrl(self.address.clone()))?
            .pop_if_empty()
            .extend([
                "auth",
                self.delay.to_string().as_str(),
                self.user.as_str(),
                hex::encode(tag).as_str(),
            ]);
        Ok(url)
    }
}

/// Guess the tag for `target` byte by byte.
///
/// `n_workers` candidates are in flight at once and each is requested
/// `n_rounds` times. Returns as soon as the server accepts a guess; if it
/// never does, the best guess is returned inside [`AttackError::Exhausted`].
pub async fn recover_tag(
    target: &AttackTarget,
    n_workers: usize,
    n_rounds: usize,
) -> Result<Vec<u8>, AttackError> {
    let client = Client::new();
    let mut tag = vec![0u8; target.tag_len];

    for i in 0..target.tag_len {
        let mut candidates: Vec<u8> = (0..=u8::MAX).collect();
        candidates.shuffle(&mut rand::thread_rng());

        let mut best_byte = 0u8;
        let mut best_duration = 0u128;
        for chunk in candidates.chunks(n_workers.max(1)) {
            let mut tasks = Vec::with_capacity(chunk.len());
            for &candidate in chunk {
                tag[i] = candidate;
                let url = target.url(&tag)?;
                let client = client.clone();
                tasks.push(tokio::spawn(async move {
                    time_candidate(&client, url, n_rounds).await
                }));
            }

            for (&candidate, result) in chunk.iter().zip(join_all(tasks).await) {
                match result {
                    Ok(Timing::Accepted) => {
                        tag[i] = candidate;
                        info!("recovered tag {}", hex::encode(&tag));
                        return Ok(tag);
                    }
                    Ok(Timing::Rejected(times)) => {
                        let duration = trimmed_mean(&times, TRIM_PERCENT);
                        if duration > best_duration {
                            best_duration = duration;
                            best_byte = candidate;
                        }
                    }
                    Ok(Timing::Failed) | Err(_) => {}
                }
            }
        }

        tag[i] = best_byte;
        debug!(
            "byte {} is {:02x} ({}us): {}",
            i,
            best_byte,
            best_duration,
            hex::encode(&tag)
        );
    }

    Err(AttackError::Exhausted { best_guess: tag })
}

enum Timing {
    Accepted,
    Rejected(Vec<u128>),
    Failed,
}

async fn time_candidate(client: &Client, url: Url, n_rounds: usize) -> Timing {
    let mut times = Vec::with_capacity(n_rounds);
    for _ in 0..n_rounds.max(1) {
        let start = Instant::now();
        let response = match client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(_) => return Timing::Failed,
        };
        let duration = start.elapsed().as_micros();
        if response.status() == StatusCode::OK {
            return Timing::Accepted;
        }
        times.push(duration);
    }
    Timing::Rejected(times)
}

fn trimmed_mean(values: &[u128], trim_percent: f32) -> u128 {
    if values.is_empty() {
        return 0;
    }
    let mut v = values.to_vec();
    v.sort();
    let trim = (v.len() as f32 * trim_percent) as usize;
    let trimmed = &v[trim..v.len() - trim];
    trimmed.iter().copied().sum::<u128>() / trimmed.len() as u128
}
