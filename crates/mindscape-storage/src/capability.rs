//! Emulation helpers for drivers that don't natively support batch writes
//! or set membership (C1, §6). A concrete `StorageDriver` can delegate its
//! `add_to_set`/`remove_from_set`/`get_set_members` to these free functions
//! instead of rejecting the capability outright, storing the set as a plain
//! JSON array behind an ordinary key.

use serde_json::Value;

use mindscape_core::errors::MindscapeResult;
use mindscape_core::traits::{StorageDriver, StorageMeta};

async fn read_set<D: StorageDriver + ?Sized>(driver: &D, set_key: &str) -> MindscapeResult<Vec<String>> {
    match driver.read(set_key).await? {
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect()),
        _ => Ok(Vec::new()),
    }
}

async fn write_set<D: StorageDriver + ?Sized>(
    driver: &D,
    tenant: &str,
    set_key: &str,
    members: Vec<String>,
) -> MindscapeResult<()> {
    let value = Value::Array(members.into_iter().map(Value::String).collect());
    driver
        .write(set_key, value, StorageMeta::new(tenant, "set"))
        .await
}

/// Adds `member` to the set at `set_key`, emulated via read-modify-write.
/// Not atomic under concurrent writers — callers that need that guarantee
/// should prefer a driver with native set support.
pub async fn emulate_add_to_set<D: StorageDriver + ?Sized>(
    driver: &D,
    tenant: &str,
    set_key: &str,
    member: &str,
) -> MindscapeResult<()> {
    let mut members = read_set(driver, set_key).await?;
    if !members.iter().any(|m| m == member) {
        members.push(member.to_string());
    }
    write_set(driver, tenant, set_key, members).await
}

pub async fn emulate_remove_from_set<D: StorageDriver + ?Sized>(
    driver: &D,
    tenant: &str,
    set_key: &str,
    member: &str,
) -> MindscapeResult<()> {
    let mut members = read_set(driver, set_key).await?;
    members.retain(|m| m != member);
    write_set(driver, tenant, set_key, members).await
}

pub async fn emulate_get_set_members<D: StorageDriver + ?Sized>(
    driver: &D,
    set_key: &str,
) -> MindscapeResult<Vec<String>> {
    read_set(driver, set_key).await
}

/// Serial fallback for `write_multi` on a driver with no native batch
/// primitive.
pub async fn emulate_write_multi<D: StorageDriver + ?Sized>(
    driver: &D,
    items: Vec<(String, Value, StorageMeta)>,
) -> MindscapeResult<()> {
    for (key, value, meta) in items {
        driver.write(&key, value, meta).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_driver::MemoryStorageDriver;

    #[tokio::test]
    async fn emulated_set_add_and_remove_round_trips() {
        let driver = MemoryStorageDriver::new();
        emulate_add_to_set(&driver, "tenant-a", "myset", "one")
            .await
            .unwrap();
        emulate_add_to_set(&driver, "tenant-a", "myset", "two")
            .await
            .unwrap();
        let members = emulate_get_set_members(&driver, "myset").await.unwrap();
        assert_eq!(members.len(), 2);

        emulate_remove_from_set(&driver, "tenant-a", "myset", "one")
            .await
            .unwrap();
        let members = emulate_get_set_members(&driver, "myset").await.unwrap();
        assert_eq!(members, vec!["two".to_string()]);
    }

    #[tokio::test]
    async fn adding_same_member_twice_is_idempotent() {
        let driver = MemoryStorageDriver::new();
        emulate_add_to_set(&driver, "tenant-a", "myset", "dup")
            .await
            .unwrap();
        emulate_add_to_set(&driver, "tenant-a", "myset", "dup")
            .await
            .unwrap();
        let members = emulate_get_set_members(&driver, "myset").await.unwrap();
        assert_eq!(members.len(), 1);
    }
}
