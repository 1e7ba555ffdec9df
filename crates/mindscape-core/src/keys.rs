//! The stable key namespaces every crate writes under (§6). Centralised
//! here so the literal patterns are defined exactly once.

pub fn memory(tenant: &str, id: &str) -> String {
    format!("mindscape:{tenant}:memory:{id}")
}

pub fn memory_prefix(tenant: &str) -> String {
    format!("mindscape:{tenant}:memory:")
}

pub fn stratify_counter(tenant: &str, agent: &str, layer: &str) -> String {
    format!("stratify:{tenant}:{agent}:{layer}")
}

pub fn summary(tenant: &str, layer: &str) -> String {
    format!("summary:{tenant}:{layer}")
}

pub fn belief(tenant: &str, id: &str) -> String {
    format!("gnosis:{tenant}:belief:{id}")
}

pub fn belief_prefix(tenant: &str) -> String {
    format!("gnosis:{tenant}:belief:")
}

pub fn belief_version(tenant: &str, id: &str, version: u64) -> String {
    format!("gnosis:{tenant}:belief:{id}:version:{version}")
}

pub fn belief_version_prefix(tenant: &str, id: &str) -> String {
    format!("gnosis:{tenant}:belief:{id}:version:")
}

pub fn lifecycle(tenant: &str, belief_id: &str) -> String {
    format!("lifecycle:{tenant}:{belief_id}")
}

pub fn confidence(tenant: &str, belief_id: &str, timestamp: i64) -> String {
    format!("confidence:{tenant}:{belief_id}:{timestamp}")
}

pub fn confidence_prefix(tenant: &str, belief_id: &str) -> String {
    format!("confidence:{tenant}:{belief_id}:")
}

pub fn contradiction(tenant: &str, id: &str) -> String {
    format!("contradictions:{tenant}:{id}")
}

pub fn active_contradictions_set(tenant: &str) -> String {
    format!("contradictions:{tenant}:active")
}

pub fn adaptive_memory(tenant: &str, id: &str) -> String {
    format!("adaptive_memory:{tenant}:{id}")
}

pub fn adaptive_memory_prefix(tenant: &str) -> String {
    format!("adaptive_memory:{tenant}:")
}

pub fn adaptive_config(tenant: &str, field: &str) -> String {
    format!("adaptive_config:{tenant}:{field}")
}

pub fn job(id: &str) -> String {
    format!("job:{id}")
}

pub fn job_prefix() -> String {
    "job:".to_string()
}

pub fn audit(tenant: &str, seq: u64) -> String {
    format!("audit:{tenant}:{seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_the_stable_namespace_patterns() {
        assert_eq!(memory("acme", "m1"), "mindscape:acme:memory:m1");
        assert_eq!(stratify_counter("acme", "agent-a", "hot"), "stratify:acme:agent-a:hot");
        assert_eq!(belief_version("acme", "b1", 3), "gnosis:acme:belief:b1:version:3");
        assert_eq!(job("j1"), "job:j1");
        assert_eq!(audit("acme", 7), "audit:acme:7");
    }
}
