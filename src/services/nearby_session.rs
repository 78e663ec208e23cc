// src/services/nearby_session.rs
// DOCUMENTATION: Live nearby-places view behind the map page
// PURPOSE: Keep POIs in sync with the map center and category

use crate::errors::TravelError;
use crate::models::{
    Coordinate, MapSnapshot, MapViewState, Poi, PoiCategory, PoiView, SessionStatus, DEFAULT_ZOOM,
};
use crate::services::{Geocoder, PoiSource};
use async_trait::async_trait;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Notice shown when the geocoder finds nothing
pub const LOCATION_NOT_FOUND: &str = "Location not found";

/// One-shot device position fix
/// DOCUMENTATION: Best effort; None means denied or unavailable
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Option<Coordinate>;
}

/// Locator answering with a preconfigured position (or none)
pub struct FixedLocator(pub Option<Coordinate>);

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn current_position(&self) -> Option<Coordinate> {
        self.0
    }
}

/// Tunables taken from Config
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub poi_limit: usize,
    pub fallback_center: Coordinate,
    pub locate_timeout: Duration,
}

/// What happened to one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Response applied; number of POIs now shown
    Applied(usize),
    /// A newer refresh was issued first; response dropped
    Stale,
    /// Remote call failed; previous POIs kept
    Failed,
}

struct SessionState {
    status: SessionStatus,
    view: MapViewState,
    /// Sequence number of the most recently issued refresh
    latest_issued: u64,
    pois: Vec<Poi>,
    /// Category the shown POIs were fetched for
    pois_category: PoiCategory,
    notice: Option<String>,
    last_error: Option<String>,
}

/// Nearby-POI session
/// DOCUMENTATION: Idle -> Locating -> Ready on start, then
/// Ready -> Refreshing -> Ready (or Error) on every center/category change.
///
/// Remote calls cannot be aborted, so each refresh is tagged with a
/// monotonically increasing sequence number, taken under the same lock that
/// snapshots the view it queries. A response is applied only if its number
/// is still the latest issued; anything older is discarded on arrival.
pub struct NearbySession {
    poi_source: Arc<dyn PoiSource>,
    geocoder: Arc<dyn Geocoder>,
    locator: Arc<dyn DeviceLocator>,
    settings: SessionSettings,
    state: RwLock<SessionState>,
}

impl NearbySession {
    pub fn new(
        poi_source: Arc<dyn PoiSource>,
        geocoder: Arc<dyn Geocoder>,
        locator: Arc<dyn DeviceLocator>,
        settings: SessionSettings,
    ) -> Self {
        let state = SessionState {
            status: SessionStatus::Idle,
            view: MapViewState {
                center: settings.fallback_center,
                category: PoiCategory::default(),
            },
            latest_issued: 0,
            pois: Vec::new(),
            pois_category: PoiCategory::default(),
            notice: None,
            last_error: None,
        };

        Self {
            poi_source,
            geocoder,
            locator,
            settings,
            state: RwLock::new(state),
        }
    }

    /// Mount the session
    /// DOCUMENTATION: Only the first call does anything. Reads the device
    /// position (bounded by the locate timeout), falls back to the
    /// configured center, then issues the first refresh.
    pub async fn start(&self) -> Option<RefreshOutcome> {
        {
            let mut state = self.state.write().await;
            if state.status != SessionStatus::Idle {
                return None;
            }
            state.status = SessionStatus::Locating;
        }

        let center = match tokio::time::timeout(
            self.settings.locate_timeout,
            self.locator.current_position(),
        )
        .await
        {
            Ok(Some(position)) if position.is_valid() => {
                log::info!("Using device position {}", position);
                position
            }
            Ok(_) => {
                log::info!(
                    "No device position, using fallback {}",
                    self.settings.fallback_center
                );
                self.settings.fallback_center
            }
            Err(_) => {
                log::warn!(
                    "Device position timed out after {:?}, using fallback {}",
                    self.settings.locate_timeout,
                    self.settings.fallback_center
                );
                self.settings.fallback_center
            }
        };

        {
            let mut state = self.state.write().await;
            // A center chosen while locating wins over the position fix
            if state.latest_issued == 0 {
                state.view.center = center;
            } else {
                log::info!("Keeping center {} chosen while locating", state.view.center);
            }
            state.status = SessionStatus::Ready;
        }

        Some(self.refresh_with(|_| {}).await)
    }

    /// Switch category; unknown labels are ignored and never sent upstream
    pub async fn set_category(&self, label: &str) -> Option<RefreshOutcome> {
        let Some(category) = PoiCategory::lookup(label) else {
            log::debug!("Ignoring unknown category {:?}", label);
            return None;
        };

        Some(self.refresh_with(|view| view.category = category).await)
    }

    /// Move the map center
    pub async fn set_center(&self, center: Coordinate) -> RefreshOutcome {
        self.refresh_with(|view| view.center = center).await
    }

    /// Re-query the current view without changing it
    #[allow(dead_code)]
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_with(|_| {}).await
    }

    /// Resolve free text and move there
    /// DOCUMENTATION: Empty text is a no-op (Ok(None)). Zero results leave
    /// the center unchanged and record a user notice, which stays until the
    /// next applied refresh. First result wins.
    pub async fn relocate(&self, text: &str) -> Result<Option<RefreshOutcome>, TravelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        match self.geocoder.geocode(text).await {
            Ok(Some(center)) => Ok(Some(self.set_center(center).await)),
            Ok(None) => {
                log::info!("No location found for {:?}", text);
                self.state.write().await.notice = Some(LOCATION_NOT_FOUND.to_string());
                Err(TravelError::GeocodeNotFound(text.to_string()))
            }
            Err(e) => {
                log::error!("Geocoding {:?} failed: {}", text, e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn refresh_with<F>(&self, change: F) -> RefreshOutcome
    where
        F: FnOnce(&mut MapViewState),
    {
        let (seq, view) = {
            let mut state = self.state.write().await;
            change(&mut state.view);
            state.latest_issued += 1;
            state.status = SessionStatus::Refreshing;
            (state.latest_issued, state.view)
        };

        log::debug!(
            "Nearby refresh #{}: {} around {}",
            seq,
            view.category.label,
            view.center
        );

        let result = self.poi_source.nearby(view.center, view.category).await;

        let mut state = self.state.write().await;
        if seq != state.latest_issued {
            log::debug!(
                "Dropping stale nearby response #{} (latest is #{})",
                seq,
                state.latest_issued
            );
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(mut pois) => {
                pois.truncate(self.settings.poi_limit);
                let count = pois.len();
                state.pois = pois;
                state.pois_category = view.category;
                state.status = SessionStatus::Ready;
                state.notice = None;
                state.last_error = None;
                RefreshOutcome::Applied(count)
            }
            Err(e) => {
                log::error!("Nearby refresh #{} failed, keeping previous results: {}", seq, e);
                state.status = SessionStatus::Error;
                state.last_error = Some(e.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    #[allow(dead_code)]
    pub async fn view(&self) -> MapViewState {
        self.state.read().await.view
    }

    #[allow(dead_code)]
    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    /// Everything the map page renders
    pub async fn snapshot(&self) -> MapSnapshot {
        let state = self.state.read().await;
        let center = state.view.center;

        MapSnapshot {
            status: state.status,
            center,
            zoom: DEFAULT_ZOOM,
            category: state.view.category.label,
            pois: state
                .pois
                .iter()
                .map(|poi| PoiView {
                    id: poi.id,
                    name: poi.label(&state.pois_category).to_string(),
                    lat: poi.lat,
                    lon: poi.lon,
                    distance_km: center.distance_km(&poi.coordinate()),
                })
                .collect(),
            notice: state.notice.clone(),
            last_error: state.last_error.clone(),
        }
    }

    /// Shown POIs as a GeoJSON FeatureCollection
    pub async fn geojson(&self) -> FeatureCollection {
        let state = self.state.read().await;

        let features = state
            .pois
            .iter()
            .map(|poi| {
                let point: geo_types::Point<f64> = poi.coordinate().into();

                let mut properties = JsonObject::new();
                properties.insert(
                    "name".to_string(),
                    Value::from(poi.label(&state.pois_category)),
                );
                properties.insert(
                    "category".to_string(),
                    Value::from(state.pois_category.label),
                );
                for (key, value) in &poi.tags {
                    properties
                        .entry(format!("tag:{}", key))
                        .or_insert_with(|| Value::from(value.as_str()));
                }

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&point))),
                    id: Some(Id::Number(poi.id.into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    type Scripted = (u64, Result<Vec<Poi>, String>);

    /// Answers calls in issue order from a script, each after its delay
    #[derive(Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<(Coordinate, &'static str)>>,
    }

    impl ScriptedSource {
        fn with(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PoiSource for ScriptedSource {
        async fn nearby(
            &self,
            center: Coordinate,
            category: PoiCategory,
        ) -> Result<Vec<Poi>, TravelError> {
            self.calls.lock().unwrap().push((center, category.label));
            let next = self.script.lock().unwrap().pop_front();
            let (delay_ms, result) = next.unwrap_or((0, Ok(Vec::new())));
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            result.map_err(TravelError::NetworkFailure)
        }
    }

    struct FakeGeocoder {
        answer: Result<Option<Coordinate>, String>,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn answering(answer: Result<Option<Coordinate>, String>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, _text: &str) -> Result<Option<Coordinate>, TravelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone().map_err(TravelError::NetworkFailure)
        }
    }

    struct SlowLocator;

    #[async_trait]
    impl DeviceLocator for SlowLocator {
        async fn current_position(&self) -> Option<Coordinate> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Some(Coordinate::new(28.6, 77.2))
        }
    }

    const MUMBAI: Coordinate = Coordinate {
        lat: 19.0760,
        lon: 72.8777,
    };
    const DELHI: Coordinate = Coordinate {
        lat: 28.6562,
        lon: 77.2410,
    };

    fn pois(ids: std::ops::Range<u64>) -> Vec<Poi> {
        ids.map(|id| Poi {
            id,
            lat: 19.07 + id as f64 * 0.0001,
            lon: 72.87,
            tags: BTreeMap::new(),
        })
        .collect()
    }

    fn shown_ids(snapshot: &MapSnapshot) -> Vec<u64> {
        snapshot.pois.iter().map(|p| p.id).collect()
    }

    fn session_with(
        source: Arc<ScriptedSource>,
        geocoder: Arc<FakeGeocoder>,
        locator: Arc<dyn DeviceLocator>,
    ) -> NearbySession {
        NearbySession::new(
            source,
            geocoder,
            locator,
            SessionSettings {
                poi_limit: 30,
                fallback_center: MUMBAI,
                locate_timeout: Duration::from_millis(50),
            },
        )
    }

    fn session(source: Arc<ScriptedSource>) -> NearbySession {
        session_with(
            source,
            FakeGeocoder::answering(Ok(None)),
            Arc::new(FixedLocator(None)),
        )
    }

    #[tokio::test]
    async fn test_start_uses_device_position() {
        let source = ScriptedSource::with(vec![(0, Ok(pois(0..3)))]);
        let session = session_with(
            source.clone(),
            FakeGeocoder::answering(Ok(None)),
            Arc::new(FixedLocator(Some(DELHI))),
        );

        assert_eq!(session.status().await, SessionStatus::Idle);
        assert_eq!(session.start().await, Some(RefreshOutcome::Applied(3)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.center, DELHI);
        assert_eq!(snapshot.zoom, 14);
        assert_eq!(source.calls.lock().unwrap()[0], (DELHI, "restaurant"));
    }

    #[tokio::test]
    async fn test_start_falls_back_without_position() {
        let session = session(ScriptedSource::with(vec![]));
        session.start().await;
        assert_eq!(session.view().await.center, MUMBAI);
    }

    #[tokio::test]
    async fn test_start_falls_back_on_timeout() {
        let session = session_with(
            ScriptedSource::with(vec![]),
            FakeGeocoder::answering(Ok(None)),
            Arc::new(SlowLocator),
        );
        session.start().await;
        assert_eq!(session.view().await.center, MUMBAI);
        assert_eq!(session.status().await, SessionStatus::Ready);
    }

    #[tokio::test]
    async fn test_center_set_while_locating_is_kept() {
        let source = ScriptedSource::with(vec![(0, Ok(pois(0..1))), (0, Ok(pois(1..3)))]);
        let session = session_with(
            source.clone(),
            FakeGeocoder::answering(Ok(None)),
            Arc::new(SlowLocator),
        );

        let (started, moved) = tokio::join!(session.start(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.set_center(DELHI).await
        });

        assert_eq!(moved, RefreshOutcome::Applied(1));
        assert_eq!(started, Some(RefreshOutcome::Applied(2)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.center, DELHI);
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert!(source.calls.lock().unwrap().iter().all(|(c, _)| *c == DELHI));
    }

    #[tokio::test]
    async fn test_start_only_once() {
        let source = ScriptedSource::with(vec![]);
        let session = session(source.clone());

        assert!(session.start().await.is_some());
        assert!(session.start().await.is_none());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_replaces_and_caps() {
        let source = ScriptedSource::with(vec![(0, Ok(pois(0..5))), (0, Ok(pois(100..150)))]);
        let session = session(source);

        session.start().await;
        assert_eq!(shown_ids(&session.snapshot().await), vec![0, 1, 2, 3, 4]);

        let outcome = session.set_category("cafe").await;
        assert_eq!(outcome, Some(RefreshOutcome::Applied(30)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.category, "cafe");
        assert_eq!(snapshot.pois.len(), 30);
        assert_eq!(snapshot.pois[0].id, 100);
        assert_eq!(snapshot.pois[0].name, "cafe");
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_sent() {
        let source = ScriptedSource::with(vec![]);
        let session = session(source.clone());
        session.start().await;

        assert_eq!(session.set_category("casino").await, None);
        assert_eq!(source.call_count(), 1);
        assert_eq!(session.view().await.category.label, "restaurant");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results() {
        let source = ScriptedSource::with(vec![
            (0, Ok(pois(0..2))),
            (0, Err("connection reset".to_string())),
            (0, Ok(pois(7..8))),
        ]);
        let session = session(source);
        session.start().await;

        assert_eq!(session.set_center(DELHI).await, RefreshOutcome::Failed);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Error);
        assert_eq!(shown_ids(&snapshot), vec![0, 1]);
        assert!(snapshot.last_error.unwrap().contains("connection reset"));

        assert_eq!(session.refresh().await, RefreshOutcome::Applied(1));
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_overpass_reply_without_elements_keeps_previous_results() {
        use crate::services::OverpassClient;
        use serde_json::json;
        use wiremock::matchers::{method, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param(
                "data",
                OverpassClient::build_query(&PoiCategory::default().tag, MUMBAI, 1000),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "elements": [
                    {"type": "node", "id": 42, "lat": 19.0765, "lon": 72.8780,
                     "tags": {"name": "Britannia & Co", "amenity": "restaurant"}}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"remark": "runtime error: Query timed out"})),
            )
            .mount(&server)
            .await;

        let overpass = OverpassClient::new(
            server.uri(),
            "travel-places-test/0.1",
            Duration::from_secs(5),
            1000,
        )
        .unwrap();
        let session = NearbySession::new(
            Arc::new(overpass),
            FakeGeocoder::answering(Ok(None)),
            Arc::new(FixedLocator(None)),
            SessionSettings {
                poi_limit: 30,
                fallback_center: MUMBAI,
                locate_timeout: Duration::from_millis(50),
            },
        );

        assert_eq!(session.start().await, Some(RefreshOutcome::Applied(1)));
        assert_eq!(
            session.set_category("cafe").await,
            Some(RefreshOutcome::Failed)
        );

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Error);
        assert_eq!(shown_ids(&snapshot), vec![42]);
        assert_eq!(snapshot.pois[0].name, "Britannia & Co");
        assert!(snapshot.last_error.unwrap().contains("Parse error"));
    }

    #[tokio::test]
    async fn test_late_response_of_superseded_request_is_dropped() {
        let source = ScriptedSource::with(vec![
            (0, Ok(pois(0..1))),
            // R1: slow
            (80, Ok(pois(10..12))),
            // R2: fast
            (0, Ok(pois(20..23))),
        ]);
        let session = session(source);
        session.start().await;

        let (first, second) = tokio::join!(session.set_center(DELHI), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            session.set_category("museum").await
        });

        assert_eq!(first, RefreshOutcome::Stale);
        assert_eq!(second, Some(RefreshOutcome::Applied(3)));

        let snapshot = session.snapshot().await;
        assert_eq!(shown_ids(&snapshot), vec![20, 21, 22]);
        assert_eq!(snapshot.center, DELHI);
        assert_eq!(snapshot.category, "museum");
        assert_eq!(snapshot.status, SessionStatus::Ready);
    }

    #[tokio::test]
    async fn test_relocate_empty_is_noop() {
        let geocoder = FakeGeocoder::answering(Ok(Some(DELHI)));
        let session = session_with(
            ScriptedSource::with(vec![]),
            geocoder.clone(),
            Arc::new(FixedLocator(None)),
        );

        assert_eq!(session.relocate("   ").await.unwrap(), None);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_relocate_moves_center() {
        let source = ScriptedSource::with(vec![(0, Ok(vec![])), (0, Ok(pois(0..4)))]);
        let session = session_with(
            source.clone(),
            FakeGeocoder::answering(Ok(Some(DELHI))),
            Arc::new(FixedLocator(None)),
        );
        session.start().await;

        let outcome = session.relocate("Red Fort").await.unwrap();
        assert_eq!(outcome, Some(RefreshOutcome::Applied(4)));
        assert_eq!(session.view().await.center, DELHI);
        assert_eq!(source.calls.lock().unwrap()[1].0, DELHI);
    }

    #[tokio::test]
    async fn test_relocate_not_found_keeps_center() {
        let source = ScriptedSource::with(vec![]);
        let session = session(source.clone());
        session.start().await;

        let result = session.relocate("Atlantis").await;
        assert!(matches!(result, Err(TravelError::GeocodeNotFound(_))));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.center, MUMBAI);
        assert_eq!(snapshot.notice.as_deref(), Some(LOCATION_NOT_FOUND));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_notice_cleared_by_next_applied_refresh() {
        let source = ScriptedSource::with(vec![
            (0, Ok(pois(0..1))),
            (0, Err("connection reset".to_string())),
            (0, Ok(pois(3..5))),
        ]);
        let session = session(source);
        session.start().await;

        assert!(session.relocate("Atlantis").await.is_err());

        // a failed refresh leaves the notice up
        session.set_center(DELHI).await;
        assert_eq!(
            session.snapshot().await.notice.as_deref(),
            Some(LOCATION_NOT_FOUND)
        );

        assert_eq!(
            session.set_category("cafe").await,
            Some(RefreshOutcome::Applied(2))
        );
        assert!(session.snapshot().await.notice.is_none());
    }

    #[tokio::test]
    async fn test_relocate_network_failure_keeps_center() {
        let session = session_with(
            ScriptedSource::with(vec![]),
            FakeGeocoder::answering(Err("dns".to_string())),
            Arc::new(FixedLocator(None)),
        );
        session.start().await;

        let result = session.relocate("Jaipur").await;
        assert!(matches!(result, Err(TravelError::NetworkFailure(_))));
        assert_eq!(session.view().await.center, MUMBAI);
    }

    #[tokio::test]
    async fn test_geojson_export() {
        let mut named = pois(5..6);
        named[0].tags.insert("name".into(), "Cafe Mondegar".into());
        let session = session(ScriptedSource::with(vec![(0, Ok(named))]));
        session.start().await;

        let collection = session.geojson().await;
        assert_eq!(collection.features.len(), 1);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert_eq!(json["features"][0]["geometry"]["coordinates"][0], 72.87);
        assert_eq!(json["features"][0]["properties"]["name"], "Cafe Mondegar");
        assert_eq!(json["features"][0]["id"], 5);
    }
}
