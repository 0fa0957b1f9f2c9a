//! Service flow tests — verify caching, invalidation, and retries
//! against a real HTTP backend.
//!
//! The stub counts requests per endpoint, so every assertion about
//! "served from cache" or "refetched exactly once" is checked against
//! actual wire traffic, not internal state.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};

    use celulog_client::{ApiError, CelluloseClient};
    use celulog_core::{LoadDraft, LoadFilter};

    use crate::{LoadService, QueryKey, QueryStatus};

    // =====================================================================
    // Stub backend with request counters
    // =====================================================================

    #[derive(Clone, Default)]
    struct StubState {
        loads: Arc<Mutex<Vec<serde_json::Value>>>,
        next_id: Arc<AtomicU32>,
        hits_latest: Arc<AtomicU32>,
        hits_day: Arc<AtomicU32>,
        hits_filtered: Arc<AtomicU32>,
        /// Remaining `/filtered` calls to fail with a 500.
        filtered_failures: Arc<AtomicU32>,
    }

    fn seed_load(id: &str, material: &str, created_at: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "material": material,
            "averageWeight": 3000.0,
            "unit": "KG",
            "createdAt": created_at,
            "timezone": "America/Sao_Paulo",
            "operator": "felipe rodrigues",
            "shift": "a",
        })
    }

    async fn latest_handler(State(st): State<StubState>) -> Json<serde_json::Value> {
        st.hits_latest.fetch_add(1, Ordering::SeqCst);
        Json(serde_json::Value::Array(st.loads.lock().unwrap().clone()))
    }

    async fn day_handler(State(st): State<StubState>) -> Json<serde_json::Value> {
        st.hits_day.fetch_add(1, Ordering::SeqCst);
        let loads = st.loads.lock().unwrap();
        let mut totals: Vec<(String, f64)> = Vec::new();
        for load in loads.iter() {
            let material = load["material"].as_str().unwrap_or_default().to_string();
            let weight = load["averageWeight"].as_f64().unwrap_or_default();
            match totals.iter_mut().find(|(m, _)| *m == material) {
                Some((_, t)) => *t += weight,
                None => totals.push((material, weight)),
            }
        }
        let body: Vec<serde_json::Value> = totals
            .into_iter()
            .map(|(m, t)| serde_json::json!({"material": m, "totalWeight": t}))
            .collect();
        Json(serde_json::Value::Array(body))
    }

    async fn filtered_handler(
        State(st): State<StubState>,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        st.hits_filtered.fetch_add(1, Ordering::SeqCst);
        if st
            .filtered_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "temporarily unavailable"})),
            )
                .into_response();
        }
        let material = body["material"].as_str().unwrap_or_default();
        let loads = st.loads.lock().unwrap();
        let hits: Vec<serde_json::Value> = loads
            .iter()
            .filter(|l| material.is_empty() || l["material"].as_str() == Some(material))
            .cloned()
            .collect();
        Json(serde_json::Value::Array(hits)).into_response()
    }

    async fn create_handler(
        State(st): State<StubState>,
        Json(mut body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        let n = st.next_id.fetch_add(1, Ordering::SeqCst);
        body["id"] = serde_json::json!(format!("load-{}", n));
        st.loads.lock().unwrap().push(body.clone());
        Json(body)
    }

    async fn update_handler(
        Path(id): Path<String>,
        State(st): State<StubState>,
        Json(mut body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        body["id"] = serde_json::json!(id);
        let mut loads = st.loads.lock().unwrap();
        match loads.iter_mut().find(|l| l["id"] == body["id"]) {
            Some(slot) => {
                *slot = body.clone();
                Json(body).into_response()
            }
            None => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "load not found"})),
            )
                .into_response(),
        }
    }

    async fn delete_handler(
        Path(id): Path<String>,
        State(st): State<StubState>,
    ) -> axum::response::Response {
        let mut loads = st.loads.lock().unwrap();
        let before = loads.len();
        loads.retain(|l| l["id"].as_str() != Some(id.as_str()));
        if loads.len() == before {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "load not found"})),
            )
                .into_response();
        }
        StatusCode::OK.into_response()
    }

    async fn start_service(seed: Vec<serde_json::Value>) -> (LoadService, StubState) {
        let state = StubState {
            loads: Arc::new(Mutex::new(seed)),
            ..Default::default()
        };

        let app = Router::new()
            .route("/api/celulose/latest", get(latest_handler))
            .route("/api/celulose/day", get(day_handler))
            .route("/api/celulose/filtered", post(filtered_handler))
            .route("/api/celulose", post(create_handler))
            .route("/api/celulose/:id", put(update_handler).delete(delete_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait until the socket accepts connections; plain TCP so the
        // endpoint hit counters stay untouched.
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        (LoadService::new(CelluloseClient::new(base_url)), state)
    }

    fn sample_draft() -> LoadDraft {
        LoadDraft::new_entry(
            "fibra longa klabin",
            "aldo vitorino da silva",
            "b",
            "2024-03-05 14:30:00",
            "America/Sao_Paulo",
        )
    }

    // =====================================================================
    // Caching and invalidation
    // =====================================================================

    #[tokio::test]
    async fn repeated_reads_hit_the_wire_once() {
        let (service, state) =
            start_service(vec![seed_load("a1", "fibra curta klabin", "2024-03-05 08:00:00")]).await;

        for _ in 0..3 {
            assert_eq!(service.latest().await.unwrap().len(), 1);
            assert_eq!(service.day_summary().await.unwrap().len(), 1);
        }
        assert_eq!(state.hits_latest.load(Ordering::SeqCst), 1);
        assert_eq!(state.hits_day.load(Ordering::SeqCst), 1);
        assert_eq!(service.status(QueryKey::Latest).await, QueryStatus::Ready);
    }

    #[tokio::test]
    async fn register_then_latest_shows_the_new_load() {
        let (service, state) = start_service(vec![]).await;

        assert!(service.latest().await.unwrap().is_empty());

        let created = service
            .create(&sample_draft(), &[QueryKey::Latest, QueryKey::DaySummary])
            .await
            .unwrap();
        let id = created.id.expect("backend assigns an id");

        let loads = service.latest().await.unwrap();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].id, id);
        assert_eq!(loads[0].material, "fibra longa klabin");

        let summary = service.day_summary().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_weight, 3000.0);

        // One initial read plus one post-invalidation refetch.
        assert_eq!(state.hits_latest.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_refetches_exactly_once() {
        let (service, state) = start_service(vec![]).await;

        service.latest().await.unwrap();
        service
            .create(&sample_draft(), &[QueryKey::Latest])
            .await
            .unwrap();

        service.latest().await.unwrap();
        service.latest().await.unwrap();
        service.latest().await.unwrap();
        assert_eq!(
            state.hits_latest.load(Ordering::SeqCst),
            2,
            "first read, then a single refetch after the create"
        );
    }

    #[tokio::test]
    async fn views_not_listed_keep_their_cache() {
        let (service, state) = start_service(vec![]).await;

        service.latest().await.unwrap();
        service.day_summary().await.unwrap();

        // Create invalidates only the latest view.
        service
            .create(&sample_draft(), &[QueryKey::Latest])
            .await
            .unwrap();

        service.latest().await.unwrap();
        service.day_summary().await.unwrap();

        assert_eq!(state.hits_latest.load(Ordering::SeqCst), 2);
        assert_eq!(
            state.hits_day.load(Ordering::SeqCst),
            1,
            "day summary was not listed, so it must not refetch"
        );
        assert_eq!(service.status(QueryKey::DaySummary).await, QueryStatus::Ready);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_caches_untouched() {
        let (service, state) = start_service(vec![]).await;

        service.latest().await.unwrap();

        let ghost = sample_draft().with_id("ghost");
        let err = service
            .update(&ghost, &[QueryKey::Latest, QueryKey::DaySummary])
            .await
            .unwrap_err();
        match err {
            ApiError::Server { status, .. } => assert_eq!(status, 404),
            other => panic!("expected 404, got: {:?}", other),
        }

        service.latest().await.unwrap();
        assert_eq!(
            state.hits_latest.load(Ordering::SeqCst),
            1,
            "failed update must not invalidate"
        );
        assert_eq!(service.status(QueryKey::Latest).await, QueryStatus::Ready);
    }

    #[tokio::test]
    async fn refresh_outdates_both_main_views() {
        let (service, state) = start_service(vec![]).await;

        service.latest().await.unwrap();
        service.day_summary().await.unwrap();

        service.refresh().await;
        assert_eq!(service.status(QueryKey::Latest).await, QueryStatus::Stale);

        service.latest().await.unwrap();
        service.day_summary().await.unwrap();
        assert_eq!(state.hits_latest.load(Ordering::SeqCst), 2);
        assert_eq!(state.hits_day.load(Ordering::SeqCst), 2);
    }

    // =====================================================================
    // Filtered search
    // =====================================================================

    #[tokio::test]
    async fn filtered_never_fetches_until_asked_and_caches_per_filter() {
        let (service, state) = start_service(vec![
            seed_load("a1", "fibra curta klabin", "2024-03-01 08:00:00"),
            seed_load("a2", "fibra longa mercer", "2024-03-02 08:00:00"),
        ])
        .await;

        assert_eq!(service.status(QueryKey::Filtered).await, QueryStatus::Idle);
        assert_eq!(state.hits_filtered.load(Ordering::SeqCst), 0);

        let curta = LoadFilter {
            material: Some("fibra curta klabin".into()),
            ..Default::default()
        };
        let everything = LoadFilter::default();

        assert_eq!(service.filtered(&curta).await.unwrap().len(), 1);
        assert_eq!(service.filtered(&everything).await.unwrap().len(), 2);
        assert_eq!(service.filtered(&curta).await.unwrap().len(), 1);

        assert_eq!(
            state.hits_filtered.load(Ordering::SeqCst),
            2,
            "distinct filters fetch once each; the repeat is a cache hit"
        );
        assert_eq!(service.status(QueryKey::Filtered).await, QueryStatus::Ready);
    }

    #[tokio::test]
    async fn filtered_retries_transient_failures() {
        let (service, state) =
            start_service(vec![seed_load("a1", "fibra curta klabin", "2024-03-01 08:00:00")]).await;
        state.filtered_failures.store(2, Ordering::SeqCst);

        let loads = service.filtered(&LoadFilter::default()).await.unwrap();
        assert_eq!(loads.len(), 1);
        assert_eq!(
            state.hits_filtered.load(Ordering::SeqCst),
            3,
            "two 500s, then the successful attempt"
        );
    }

    #[tokio::test]
    async fn delete_from_the_report_screen_invalidates_only_searches() {
        let (service, state) = start_service(vec![
            seed_load("a1", "fibra curta klabin", "2024-03-01 08:00:00"),
            seed_load("a2", "fibra curta klabin", "2024-03-02 08:00:00"),
        ])
        .await;

        service.latest().await.unwrap();
        let filter = LoadFilter::default();
        assert_eq!(service.filtered(&filter).await.unwrap().len(), 2);

        service.delete("a1", &[QueryKey::Filtered]).await.unwrap();

        assert_eq!(service.cached_filtered(&filter).await, None);
        assert_eq!(service.filtered(&filter).await.unwrap().len(), 1);
        assert_eq!(state.hits_filtered.load(Ordering::SeqCst), 2);
        assert_eq!(
            state.hits_latest.load(Ordering::SeqCst),
            1,
            "latest was not listed for invalidation"
        );
    }
}
