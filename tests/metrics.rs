use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use httpmock::MockServer;
use ikono::{
    application::{
        content::{ContentService, Fetched},
        repos::CollectionParams,
    },
    cache::{ImageCacheConfig, ImageUrlCache},
    config::CockpitSettings,
    domain::{
        entities::Artist,
        images::{ImageCacheKey, ImageOptions},
        locale::Locale,
    },
    infra::{cockpit::CockpitClient, telemetry},
};
use metrics_util::debugging::DebuggingRecorder;
use serde_json::json;
use url::Url;

#[tokio::test]
async fn cache_and_fetch_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    // Image URL cache hit/miss/evict
    let cache = ImageUrlCache::new(ImageCacheConfig {
        ttl: Duration::from_secs(60),
        sweep_interval: Duration::from_secs(60),
    });
    let key = ImageCacheKey::new("img1", &ImageOptions::default());
    let stale = ImageCacheKey::new("img2", &ImageOptions::default());
    let now = Instant::now();

    assert!(cache.get_at(&key, now).is_none());
    cache.insert_at(key.clone(), "https://cdn.example.org/img1.webp", now);
    assert!(cache.get_at(&key, now).is_some());
    cache.insert_at(stale, "https://cdn.example.org/img2.webp", now);
    assert_eq!(cache.sweep_at(now + Duration::from_secs(120)), 2);

    // Cockpit latency and fail-open counter
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/content/items/artist");
            then.status(200).json_body(json!([{ "_id": "ar1", "name": "Aiko" }]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/content/items/exhibition");
            then.status(502);
        })
        .await;

    let settings = CockpitSettings {
        base_url: Url::parse(&server.base_url()).expect("base url"),
        api_token: "test-token".to_string(),
        request_timeout: Duration::from_secs(5),
        image_timeout: Duration::from_secs(5),
        default_locale: Locale::En,
    };
    let client = CockpitClient::new(&settings).expect("client");
    let service = ContentService::new(Arc::new(client), Locale::En);

    let artists: Fetched<Vec<Artist>> = service
        .get_collection("artist", CollectionParams::new())
        .await;
    assert_eq!(artists.value().len(), 1);
    let exhibitions: Fetched<Vec<serde_json::Value>> = service
        .get_collection("exhibition", CollectionParams::new())
        .await;
    assert!(exhibitions.is_degraded());

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "ikono_image_cache_hit_total",
        "ikono_image_cache_miss_total",
        "ikono_image_cache_evict_total",
        "ikono_cms_fetch_failed_total",
        "ikono_cms_fetch_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
