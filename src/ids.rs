//! Token generation for session keys and correlation ids.
//!
//! Generation is behind a trait so services and the relay bridge can be
//! driven with deterministic ids under test.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of opaque, unguessable tokens (UUID v4 on the wire).
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by `uuid::Uuid::new_v4`.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator for tests. Emits well-formed UUID v4 strings
/// with an incrementing suffix so history lookups keyed by the generated
/// value still pass shape validation.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("00000000-0000-4000-8000-{:012x}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_uuids() {
        let ids = RandomIds;
        let id = ids.generate();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, ids.generate());
    }

    #[test]
    fn sequential_ids_increment_and_keep_uuid_shape() {
        let ids = SequentialIds::new();
        assert_eq!(ids.generate(), "00000000-0000-4000-8000-000000000000");
        assert_eq!(ids.generate(), "00000000-0000-4000-8000-000000000001");
        assert!(Uuid::parse_str(&ids.generate()).is_ok());
    }
}
