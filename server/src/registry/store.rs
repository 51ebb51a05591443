//! Registry of all known rovers

use super::model::{ConnectionStatus, RoverState, RoverSummary, StatusUpdate};
use roverlink_shared::WireCommand;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the server knows, behind one lock
///
/// Rover records and command queues share the lock so a poll and an enqueue
/// never interleave.
#[derive(Debug, Default)]
pub(crate) struct Store {
    pub(crate) rovers: BTreeMap<String, RoverState>,
    pub(crate) queues: HashMap<String, VecDeque<WireCommand>>,
}

pub(crate) type SharedStore = Arc<Mutex<Store>>;

/// Concurrency-safe table of rover records
///
/// Every operation is a single short critical section; no lock is held
/// across network I/O.
#[derive(Debug, Clone, Default)]
pub struct RoverRegistry {
    store: SharedStore,
}

impl RoverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn shared(&self) -> SharedStore {
        self.store.clone()
    }

    /// Register a rover, or touch its address if already known
    pub async fn create(&self, id: &str, address: Option<String>) -> RoverState {
        let mut store = self.store.lock().await;

        match store.rovers.get_mut(id) {
            Some(rover) => {
                if address.is_some() {
                    rover.address = address;
                }
                rover.clone()
            }
            None => {
                let rover = RoverState::new(id, address);
                store.rovers.insert(id.to_string(), rover.clone());
                rover
            }
        }
    }

    /// Merge a status report into the rover's record, creating it if needed
    pub async fn upsert_status(&self, id: &str, update: StatusUpdate, address: Option<String>) {
        let mut store = self.store.lock().await;
        let rover = store
            .rovers
            .entry(id.to_string())
            .or_insert_with(|| RoverState::new(id, None));

        rover.merge(update);
        rover.id = id.to_string();
        if address.is_some() {
            rover.address = address;
        }
    }

    /// Set the operator goal, creating the record if needed
    pub async fn set_goal(&self, id: &str, goal: Value) -> RoverState {
        let mut store = self.store.lock().await;
        let rover = store
            .rovers
            .entry(id.to_string())
            .or_insert_with(|| RoverState::new(id, None));

        rover.goal = Some(goal);
        rover.clone()
    }

    /// Listing projection, sorted by rover id
    pub async fn list(&self) -> Vec<RoverSummary> {
        let store = self.store.lock().await;
        store.rovers.values().map(RoverState::summary).collect()
    }

    /// Full record lookup
    pub async fn get(&self, id: &str) -> Option<RoverState> {
        self.store.lock().await.rovers.get(id).cloned()
    }

    /// Address on file for a rover
    pub async fn address_of(&self, id: &str) -> Option<String> {
        let store = self.store.lock().await;
        store.rovers.get(id).and_then(|r| r.address.clone())
    }

    /// Record the outcome of a reachability probe
    pub async fn update_connection(&self, id: &str, status: ConnectionStatus) {
        let mut store = self.store.lock().await;
        if let Some(rover) = store.rovers.get_mut(id) {
            rover.connection = Some(status);
        }
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.store.lock().await.rovers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roverlink_shared::{PddState, RoverMode};
    use serde_json::json;

    fn update(value: Value) -> StatusUpdate {
        StatusUpdate::from_report(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_defaults() {
        let registry = RoverRegistry::new();
        registry.create("r1", None).await;

        let rover = registry.get("r1").await.unwrap();
        assert_eq!(rover.mode, RoverMode::Manual);
        assert_eq!(rover.pdd_state, PddState::Stop);
        assert_eq!(rover.gps, json!({}));
    }

    #[tokio::test]
    async fn test_create_is_idempotent_and_touches_address() {
        let registry = RoverRegistry::new();
        registry.create("r1", Some("10.0.0.1:8100".into())).await;
        registry.upsert_status("r1", update(json!({"mode": "AUTO"})), None).await;

        let rover = registry.create("r1", None).await;
        assert_eq!(rover.mode, RoverMode::Auto);
        assert_eq!(rover.address.as_deref(), Some("10.0.0.1:8100"));

        let rover = registry.create("r1", Some("10.0.0.9:8100".into())).await;
        assert_eq!(rover.address.as_deref(), Some("10.0.0.9:8100"));
        assert_eq!(rover.mode, RoverMode::Auto);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_preserves_unreported_fields() {
        let registry = RoverRegistry::new();
        registry
            .upsert_status("r1", update(json!({"gps": {"lat": 1.0, "lon": 2.0}})), None)
            .await;
        registry.upsert_status("r1", update(json!({"mode": "AUTO"})), None).await;

        let rover = registry.get("r1").await.unwrap();
        assert_eq!(rover.mode, RoverMode::Auto);
        assert_eq!(rover.gps, json!({"lat": 1.0, "lon": 2.0}));
    }

    #[tokio::test]
    async fn test_upsert_address_only_when_supplied() {
        let registry = RoverRegistry::new();
        registry.create("r1", Some("a:1".into())).await;

        registry.upsert_status("r1", StatusUpdate::default(), None).await;
        assert_eq!(registry.address_of("r1").await.as_deref(), Some("a:1"));

        registry
            .upsert_status("r1", StatusUpdate::default(), Some("b:2".into()))
            .await;
        assert_eq!(registry.address_of("r1").await.as_deref(), Some("b:2"));
    }

    #[tokio::test]
    async fn test_set_goal_auto_creates() {
        let registry = RoverRegistry::new();
        let rover = registry.set_goal("r9", json!({"waypoints": [[1.0, 2.0]]})).await;

        assert_eq!(rover.id, "r9");
        assert_eq!(rover.goal, Some(json!({"waypoints": [[1.0, 2.0]]})));
        assert_eq!(rover.pdd_state, PddState::Stop);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let registry = RoverRegistry::new();
        for id in ["r3", "r1", "r2"] {
            registry.create(id, None).await;
        }

        let ids: Vec<String> = registry.list().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let registry = RoverRegistry::new();
        assert!(registry.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_update_connection() {
        let registry = RoverRegistry::new();
        registry.create("r1", None).await;

        let status = ConnectionStatus::offline(Utc::now(), "connection refused");
        registry.update_connection("r1", status.clone()).await;
        assert_eq!(registry.get("r1").await.unwrap().connection, Some(status));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_are_serialized() {
        let registry = RoverRegistry::new();
        let mut handles = Vec::new();

        for i in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("r{}", i % 4);
                registry
                    .upsert_status(&id, update(json!({"seq": i})), None)
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.count().await, 4);
    }
}
