//! Opaque identifier generation.
//!
//! UUIDv7 keeps ids roughly time-ordered, which gives the in-memory store a
//! stable scan order. Domain prefixes make ids self-describing in logs.

use uuid::Uuid;

pub fn agent_id() -> String {
    format!("agent_{}", Uuid::now_v7().simple())
}

pub fn capability_id() -> String {
    format!("cap_{}", Uuid::now_v7().simple())
}

pub fn transaction_id() -> String {
    format!("tx_{}", Uuid::now_v7().simple())
}

pub fn request_id() -> String {
    format!("req_{}", Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_carry_domain_prefix() {
        assert!(agent_id().starts_with("agent_"));
        assert!(capability_id().starts_with("cap_"));
        assert!(transaction_id().starts_with("tx_"));
        assert!(request_id().starts_with("req_"));
    }

    #[test]
    fn test_agent_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(agent_id()));
        }
    }
}
