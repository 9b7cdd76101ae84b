//! Typed pagination cursors.
//!
//! A cursor encodes a strict position in a total ordering (sort key plus
//! tie-breaking identifiers), never a plain offset, so traversal stays
//! gap-free and duplicate-free even while writers extend the index between
//! pages. Each cursor flavor has its own textual format and each decoder
//! rejects the other's: a cursor is only valid for the query shape that
//! produced it.

use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed pagination cursor: {0}")]
pub struct CursorError(pub String);

/// Resume point of a time-bounded transaction scan.
///
/// Serializes as `start:position-stop` (all decimal). The stop height is
/// carried inside the cursor so a scan resumed later still honors the time
/// window it was created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TxCursor {
    pub from_block_height: u64,
    pub from_position: u32,
    pub stop_block_height: u64,
}

impl std::fmt::Display for TxCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.from_block_height, self.from_position, self.stop_block_height)
    }
}

impl FromStr for TxCursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CursorError(s.to_string());
        let (from, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (position, stop) = rest.split_once('-').ok_or_else(malformed)?;
        if position.contains(':') {
            return Err(malformed());
        }
        Ok(Self {
            from_block_height: from.parse().map_err(|_| malformed())?,
            from_position: position.parse().map_err(|_| malformed())?,
            stop_block_height: stop.parse().map_err(|_| malformed())?,
        })
    }
}

/// Resume point of an unspent-output scan.
///
/// Serializes as `height:position:index` (all decimal): the block height and
/// transaction position of the last returned output plus its index within
/// that transaction as the final tie-breaker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputsCursor {
    pub last_block_height: u64,
    pub last_tx_position: u32,
    pub last_output_index: u32,
}

impl std::fmt::Display for OutputsCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.last_block_height, self.last_tx_position, self.last_output_index)
    }
}

impl FromStr for OutputsCursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CursorError(s.to_string());
        let mut parts = s.split(':');
        let (height, position, index) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(height), Some(position), Some(index), None) => (height, position, index),
                _ => return Err(malformed()),
            };
        Ok(Self {
            last_block_height: height.parse().map_err(|_| malformed())?,
            last_tx_position: position.parse().map_err(|_| malformed())?,
            last_output_index: index.parse().map_err(|_| malformed())?,
        })
    }
}
