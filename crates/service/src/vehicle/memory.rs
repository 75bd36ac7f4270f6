use std::sync::Arc;

use async_trait::async_trait;
use models::{Vehicle, VehicleAttributes, VehicleJson, VehicleMapping};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::errors::ServiceError;
use crate::storage::json_mirror::JsonMirror;
use crate::vehicle::repository::VehicleRepository;

struct State {
    records: VehicleMapping,
    // highest id handed out or loaded; never decreases
    last_id: i64,
}

/// In-memory vehicle repository with an optional JSON mirror file.
///
/// Inserts are write-ahead: the mirror is rewritten with the new record
/// before the record is committed in memory, so a failed mirror write leaves
/// memory, id counter and file exactly as they were. The insert runs on its
/// own task, so dropping the caller's future cannot split the mirror write
/// from the in-memory commit.
pub struct VehicleMap {
    state: Arc<RwLock<State>>,
    mirror: Option<JsonMirror>,
}

impl VehicleMap {
    /// Build from an initial collection (possibly empty). The id counter
    /// starts after the largest id present.
    pub fn new(records: VehicleMapping) -> Self {
        let last_id = records.keys().next_back().copied().unwrap_or(0).max(0);
        Self {
            state: Arc::new(RwLock::new(State { records, last_id })),
            mirror: None,
        }
    }

    /// Mirror the collection to `mirror` after every insert.
    pub fn with_mirror(mut self, mirror: JsonMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    fn file_rows(records: &VehicleMapping) -> Vec<VehicleJson> {
        records.values().map(VehicleJson::from).collect()
    }

    async fn insert(
        state: Arc<RwLock<State>>,
        mirror: Option<JsonMirror>,
        attributes: VehicleAttributes,
    ) -> Result<Vehicle, ServiceError> {
        let mut state = state.write().await;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| ServiceError::Storage("vehicle id space exhausted".into()))?;
        let vehicle = Vehicle::new(id, attributes);

        if let Some(mirror) = &mirror {
            let mut rows = Self::file_rows(&state.records);
            rows.push(VehicleJson::from(&vehicle));
            if let Err(e) = mirror.write(&rows).await {
                error!(id, path = %mirror.path().display(), error = %e, "mirror write failed; insert discarded");
                return Err(e);
            }
        }

        state.records.insert(id, vehicle.clone());
        state.last_id = id;
        info!(id, count = state.records.len(), "vehicle added");
        Ok(vehicle)
    }
}

impl Default for VehicleMap {
    fn default() -> Self {
        Self::new(VehicleMapping::new())
    }
}

#[async_trait]
impl VehicleRepository for VehicleMap {
    async fn find_all(&self) -> Result<VehicleMapping, ServiceError> {
        let state = self.state.read().await;
        Ok(state.records.clone())
    }

    async fn add_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, ServiceError> {
        let task = tokio::spawn(Self::insert(
            Arc::clone(&self.state),
            self.mirror.clone(),
            attributes,
        ));
        task.await.map_err(ServiceError::storage)?
    }

    async fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<VehicleMapping, ServiceError> {
        let state = self.state.read().await;
        let matched: VehicleMapping = state
            .records
            .iter()
            .filter(|(_, v)| v.attributes.color == color && v.attributes.fabrication_year == year)
            .map(|(id, v)| (*id, v.clone()))
            .collect();
        debug!(%color, year, matched = matched.len(), "filtered vehicles");
        Ok(matched)
    }

    async fn flush(&self) -> Result<(), ServiceError> {
        let Some(mirror) = &self.mirror else { return Ok(()) };
        let state = self.state.read().await;
        mirror.write(&Self::file_rows(&state.records)).await?;
        info!(path = %mirror.path().display(), count = state.records.len(), "vehicles flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::future::{poll_fn, Future};
    use std::task::Poll;
    use std::time::Duration;

    use models::Dimensions;

    use super::*;

    fn attrs(brand: &str, color: &str, year: i32) -> VehicleAttributes {
        VehicleAttributes {
            brand: brand.into(),
            model: "Model".into(),
            registration: format!("{brand}-{year}"),
            color: color.into(),
            fabrication_year: year,
            capacity: 5,
            max_speed: 180.0,
            fuel_type: "gasoline".into(),
            transmission: "manual".into(),
            weight: 1200.0,
            dimensions: Dimensions { height: 1.5, length: 4.2, width: 1.8 },
        }
    }

    fn preloaded() -> VehicleMap {
        let mut m = VehicleMapping::new();
        m.insert(1, Vehicle::new(1, attrs("Ford", "red", 2020)));
        m.insert(2, Vehicle::new(2, attrs("Fiat", "blue", 2021)));
        VehicleMap::new(m)
    }

    fn temp_json() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("vehicle_map_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn first_insert_into_empty_gets_id_one() -> Result<(), anyhow::Error> {
        let repo = VehicleMap::default();
        let created = repo.add_vehicle(attrs("Ford", "red", 2020)).await?;
        assert_eq!(created.id, 1);

        let all = repo.find_all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[&1], created);
        Ok(())
    }

    #[tokio::test]
    async fn sequential_inserts_are_numbered_in_order() -> Result<(), anyhow::Error> {
        let repo = VehicleMap::default();
        let mut ids = Vec::new();
        for brand in ["A", "B", "C"] {
            ids.push(repo.add_vehicle(attrs(brand, "red", 2020)).await?.id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn insert_after_preload_continues_from_count() -> Result<(), anyhow::Error> {
        let repo = preloaded();
        let created = repo.add_vehicle(attrs("Seat", "green", 2019)).await?;
        assert_eq!(created.id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn counter_starts_after_largest_loaded_id() -> Result<(), anyhow::Error> {
        let mut m = VehicleMapping::new();
        m.insert(10, Vehicle::new(10, attrs("Ford", "red", 2020)));
        m.insert(4, Vehicle::new(4, attrs("Fiat", "red", 2020)));
        let repo = VehicleMap::new(m);
        let created = repo.add_vehicle(attrs("Seat", "red", 2020)).await?;
        assert_eq!(created.id, 11);
        assert_eq!(repo.find_all().await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_error_not_a_wrap() -> Result<(), anyhow::Error> {
        let mut m = VehicleMapping::new();
        m.insert(i64::MAX, Vehicle::new(i64::MAX, attrs("Ford", "red", 2020)));
        let repo = VehicleMap::new(m);

        let res = repo.add_vehicle(attrs("Seat", "red", 2020)).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let all = repo.find_all().await?;
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![i64::MAX]);
        Ok(())
    }

    #[tokio::test]
    async fn find_all_returns_a_copy() -> Result<(), anyhow::Error> {
        let repo = preloaded();
        let mut first = repo.find_all().await?;
        first.remove(&1);
        if let Some(v) = first.get_mut(&2) {
            v.attributes.color = "black".into();
        }

        let second = repo.find_all().await?;
        assert_eq!(second.len(), 2);
        assert_eq!(second[&2].attributes.color, "blue");
        Ok(())
    }

    #[tokio::test]
    async fn filter_matches_color_and_year_exactly() -> Result<(), anyhow::Error> {
        let repo = preloaded();

        let red_2020 = repo.get_by_color_and_year("red", 2020).await?;
        assert_eq!(red_2020.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(red_2020[&1].attributes.brand, "Ford");

        assert!(repo.get_by_color_and_year("red", 2021).await?.is_empty());
        // case-sensitive
        assert!(repo.get_by_color_and_year("Red", 2020).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn insert_writes_full_collection_to_mirror() -> Result<(), anyhow::Error> {
        let path = temp_json();
        let repo = preloaded().with_mirror(JsonMirror::new(&path));
        repo.add_vehicle(attrs("Seat", "green", 2019)).await?;

        let rows: Vec<VehicleJson> = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[2].brand, "Seat");
        assert_eq!(rows[2].height, 1.5);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mirror_write_leaves_memory_untouched() -> Result<(), anyhow::Error> {
        // a directory as the mirror target makes every write fail
        let dir = std::env::temp_dir().join(format!("vehicle_map_dir_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let repo = preloaded().with_mirror(JsonMirror::new(&dir));

        let res = repo.add_vehicle(attrs("Seat", "green", 2019)).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(repo.find_all().await?.len(), 2);

        // once the target is writable again the same repo hands out id 3,
        // so the failed attempt did not consume an id
        tokio::fs::remove_dir_all(&dir).await?;
        assert_eq!(repo.add_vehicle(attrs("Seat", "green", 2019)).await?.id, 3);

        let _ = tokio::fs::remove_file(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() -> Result<(), anyhow::Error> {
        let repo = Arc::new(VehicleMap::default());
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.add_vehicle(attrs(&format!("B{i}"), "red", 2020)).await
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await??.id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<_>>());
        assert_eq!(repo.find_all().await?.len(), 32);
        Ok(())
    }

    #[tokio::test]
    async fn flush_writes_mirror_and_is_noop_without_one() -> Result<(), anyhow::Error> {
        VehicleMap::default().flush().await?;

        let path = temp_json();
        let repo = preloaded().with_mirror(JsonMirror::new(&path));
        repo.flush().await?;
        let rows: Vec<VehicleJson> = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(rows.len(), 2);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropped_insert_still_commits_with_mirror() -> Result<(), anyhow::Error> {
        for polls in 1..=20usize {
            let path = temp_json();
            let repo = preloaded().with_mirror(JsonMirror::new(&path));

            {
                let fut = repo.add_vehicle(attrs("Seat", "green", 2019));
                tokio::pin!(fut);
                for _ in 0..polls {
                    let done = poll_fn(|cx| Poll::Ready(fut.as_mut().poll(cx).is_ready())).await;
                    if done {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
                // caller gives up here
            }

            // the detached insert finishes on its own
            let mut committed = false;
            for _ in 0..200 {
                if repo.find_all().await?.len() == 3 {
                    committed = true;
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            assert!(committed, "insert not committed after {polls} polls");

            let rows: Vec<VehicleJson> = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
            let in_memory = repo.find_all().await?;
            assert_eq!(
                rows.iter().map(|r| r.id).collect::<Vec<_>>(),
                in_memory.keys().copied().collect::<Vec<_>>()
            );

            // the next id is not reused
            assert_eq!(repo.add_vehicle(attrs("Opel", "grey", 2018)).await?.id, 4);
            let _ = tokio::fs::remove_file(&path).await;
        }
        Ok(())
    }
}
