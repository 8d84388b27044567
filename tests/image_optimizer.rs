use std::{sync::Arc, time::Duration};

use httpmock::MockServer;
use ikono::{
    application::images::ImageOptimizer,
    cache::{ImageCacheConfig, ImageUrlCache},
    config::CockpitSettings,
    domain::{
        images::{ImageFormat, ImageOptions},
        locale::Locale,
    },
    infra::cockpit::CockpitClient,
};
use url::Url;

fn optimizer(server: &MockServer) -> ImageOptimizer {
    let settings = CockpitSettings {
        base_url: Url::parse(&server.base_url()).expect("base url"),
        api_token: "test-token".to_string(),
        request_timeout: Duration::from_secs(5),
        image_timeout: Duration::from_millis(300),
        default_locale: Locale::En,
    };
    let client = CockpitClient::new(&settings).expect("client");
    ImageOptimizer::new(
        Arc::new(client),
        Arc::new(ImageUrlCache::new(ImageCacheConfig::default())),
    )
}

#[tokio::test]
async fn narrow_renditions_get_lower_quality_and_are_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/assets/image/img1")
                .query_param("w", "400")
                .query_param("h", "300")
                .query_param("m", "bestFit")
                .query_param("q", "50")
                .query_param("mime", "webp")
                .query_param("progressive", "1");
            then.status(200).body("https://cdn.example.org/img1-400.webp\n");
        })
        .await;

    let images = optimizer(&server);
    let options = ImageOptions {
        width: 400,
        height: 300,
        quality: 70,
        ..ImageOptions::default()
    };

    let first = images.get_optimized_image("img1", &options).await;
    let second = images.get_optimized_image("img1", &options).await;

    assert_eq!(first, "https://cdn.example.org/img1-400.webp");
    assert_eq!(second, first);
    assert_eq!(images.cache().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn avif_is_requested_as_webp() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/assets/image/img2")
                .query_param("mime", "webp");
            then.status(200).body("https://cdn.example.org/img2.webp");
        })
        .await;

    let options = ImageOptions {
        format: ImageFormat::Avif,
        ..ImageOptions::default()
    };
    let url = optimizer(&server).get_optimized_image("img2", &options).await;

    assert_eq!(url, "https://cdn.example.org/img2.webp");
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_transform_falls_back_to_original_asset() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/assets/image/img3");
            then.status(500);
        })
        .await;

    let images = optimizer(&server);
    let options = ImageOptions::default();
    let expected = format!("{}/api/assets/image/img3", server.base_url());

    assert_eq!(images.get_optimized_image("img3", &options).await, expected);
    // The fallback is cached, so Cockpit is asked only once.
    assert_eq!(images.get_optimized_image("img3", &options).await, expected);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_or_slow_transforms_fall_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/assets/image/blank");
            then.status(200).body("   ");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/assets/image/slow");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .body("https://cdn.example.org/slow.webp");
        })
        .await;

    let images = optimizer(&server);
    let options = ImageOptions::default();

    assert_eq!(
        images.get_optimized_image("blank", &options).await,
        format!("{}/api/assets/image/blank", server.base_url())
    );
    assert_eq!(
        images.get_optimized_image("slow", &options).await,
        format!("{}/api/assets/image/slow", server.base_url())
    );
}

#[tokio::test]
async fn srcset_skips_breakpoints_beyond_upscale_limit() {
    let server = MockServer::start_async().await;
    for width in ["320", "480", "768", "1024"] {
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/assets/image/hero")
                    .query_param("w", width);
                then.status(200)
                    .body(format!("https://cdn.example.org/hero-{width}.webp"));
            })
            .await;
    }

    let base = ImageOptions {
        width: 800,
        height: 600,
        ..ImageOptions::default()
    };
    let srcset = optimizer(&server)
        .generate_responsive_srcset("hero", &base, &[320, 480, 768, 1024, 1600])
        .await;

    assert_eq!(
        srcset,
        "https://cdn.example.org/hero-320.webp 320w, \
         https://cdn.example.org/hero-480.webp 480w, \
         https://cdn.example.org/hero-768.webp 768w, \
         https://cdn.example.org/hero-1024.webp 1024w"
    );
    assert!(!srcset.contains("1600w"));
}

#[tokio::test]
async fn preload_returns_urls_in_input_order() {
    let server = MockServer::start_async().await;
    for id in ["a", "b"] {
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path(format!("/api/assets/image/{id}"))
                    .query_param("q", "60");
                then.status(200).body(format!("https://cdn.example.org/{id}.webp"));
            })
            .await;
    }

    let images = optimizer(&server);
    let urls = images.preload(&["b", "a"], None).await;

    assert_eq!(
        urls,
        vec![
            "https://cdn.example.org/b.webp".to_string(),
            "https://cdn.example.org/a.webp".to_string(),
        ]
    );
    assert_eq!(images.cache().len(), 2);
}

#[tokio::test]
async fn srcset_candidates_use_width_adjusted_quality() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/assets/image/hero")
                .query_param("w", "320")
                .query_param("h", "240")
                .query_param("q", "50");
            then.status(200).body("https://cdn.example.org/hero-320.webp");
        })
        .await;

    let base = ImageOptions {
        width: 800,
        height: 600,
        quality: 90,
        ..ImageOptions::default()
    };
    let srcset = optimizer(&server)
        .generate_responsive_srcset("hero", &base, &[320])
        .await;

    assert_eq!(srcset, "https://cdn.example.org/hero-320.webp 320w");
    mock.assert_async().await;
}
