//! Exponential backoff with jitter for transient chat-provider errors
//! (spec §4.4, §9: "treat the retry budget as per-step, not per-turn").

use std::time::Duration;

use rand::Rng;

const BASE_DELAY_MS: u64 = 250;
const MAX_BASE_DELAY_MS: u64 = 8_000;

/// Delay before retry attempt `attempt` (1-indexed: the first retry is
/// `attempt == 1`). Doubles each attempt up to a ceiling, plus up to 50%
/// jitter so concurrent subagents don't retry in lockstep.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let scaled = BASE_DELAY_MS.saturating_mul(1u64 << attempt.min(5));
    let base = scaled.min(MAX_BASE_DELAY_MS);
    let jitter = rand::thread_rng().gen_range(0..=(base / 2).max(1));
    Duration::from_millis(base + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_with_attempt_number() {
        let first = backoff_delay(1);
        let later = backoff_delay(4);
        assert!(later >= first);
    }

    #[test]
    fn delay_is_capped() {
        let delay = backoff_delay(20);
        assert!(delay <= Duration::from_millis(MAX_BASE_DELAY_MS + MAX_BASE_DELAY_MS / 2));
    }
}
