#![allow(clippy::new_without_default)]

pub mod parsers;
pub mod service;

/// Generates a fresh request id.
///
/// Request ids are attached to the tracing span of every inbound gateway
/// call; batch items derive their own sub-request id from the same
/// generator. They are only ever used for log correlation.
pub fn request_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique_enough() {
        let a = request_id();
        let b = request_id();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }
}
