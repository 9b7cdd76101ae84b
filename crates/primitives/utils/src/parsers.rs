use anyhow::{anyhow, bail};

use std::time::Duration;

/// Parses a string duration & return it as [Duration].
///
/// Accepted suffixes are `ms`, `s`, `min` and `h`. Tailing transaction
/// queries carry their wait timeout in this format; a malformed value is a
/// caller error surfaced before any wait begins.
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    let split_index = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(|| anyhow!("Invalid duration format: {}", s))?;

    let (value_str, suffix) = s.split_at(split_index);
    let value: u64 = value_str.parse().map_err(|_| anyhow!("Invalid duration value: {}", value_str))?;

    match suffix.trim() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "min" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => bail!("Invalid duration suffix: {}. Expected 'ms', 's', 'min' or 'h'.", suffix),
    }
}
