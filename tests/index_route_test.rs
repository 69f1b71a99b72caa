//! Integration tests for the index polling route.
//!
//! Requests go through the full router: identification, player lookup,
//! compilation and publishing into a temporary index directory.

mod common;

use axum::http::{header, StatusCode};
use common::{body_to_string, TestHarness, GARLIC_UA, GARLIC_UUID};
use playout_common::{ExportUnit, PlayerStatus, PlaylistId, PlaylistMode, Zone, Zones};

// ---------------------------------------------------------------------------
// Health & identification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_endpoint() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let harness = TestHarness::new();
    let response = playout::server::create_router(harness.ctx.clone())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_user_agent_is_forbidden() {
    let harness = TestHarness::new();

    let response = harness
        .poll(Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0"), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_to_string(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_missing_user_agent_is_forbidden() {
    let harness = TestHarness::new();

    let response = harness.poll(None, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_new_device_gets_unreleased_fixture() {
    let harness = TestHarness::new();

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/smil+xml");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=index.smil"
    );

    let expected = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/resources/smil/unreleased.smil"
    ))
    .unwrap();
    assert_eq!(body_to_string(response.into_body()).await, expected);

    assert_eq!(harness.player_status(GARLIC_UUID), Some(PlayerStatus::Unregistered));
}

// ---------------------------------------------------------------------------
// Compiled indexes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_released_player_gets_compiled_index() {
    let harness = TestHarness::new();
    let playlist = harness.seed_playlist(
        PlaylistMode::Master,
        "<img src=\"https://cdn.test/a.jpg\" region=\"screen\" dur=\"10s\"/>\n",
        "<prefetch src=\"https://cdn.test/a.jpg\"/>\n",
        "",
    );
    harness.seed_player(GARLIC_UUID, PlayerStatus::Released, Some(playlist));

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let last_modified = response.headers()[header::LAST_MODIFIED]
        .to_str()
        .unwrap()
        .to_string();
    let body = body_to_string(response.into_body()).await;

    assert!(body.contains("https://cdn.test/a.jpg"));
    assert!(body.contains("<prefetch src=\"https://cdn.test/a.jpg\"/>"));
    assert!(body.contains("regionName=\"screen\""));

    let published = harness
        .index_dir
        .join(GARLIC_UUID)
        .join(format!("{}.smil", playlist));
    assert_eq!(std::fs::read_to_string(&published).unwrap(), body);

    let again = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(again.status(), StatusCode::OK);
    assert_eq!(body_to_string(again.into_body()).await, body);

    let cached = harness.poll(Some(GARLIC_UA), Some(&last_modified)).await;
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);
    assert!(body_to_string(cached.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_nested_playlists_are_resolved() {
    let harness = TestHarness::new();
    let inner = harness.seed_playlist(PlaylistMode::Internal, "<video src=\"inner.mp4\"/>\n", "", "");
    let outer = harness.seed_playlist(
        PlaylistMode::Master,
        &format!("<img src=\"outer.jpg\"/>\n{{ITEMS_{}}}\n", inner),
        "",
        "",
    );
    harness.seed_player(GARLIC_UUID, PlayerStatus::Released, Some(outer));

    let response = harness.poll(Some(GARLIC_UA), None).await;
    let body = body_to_string(response.into_body()).await;

    assert!(body.contains("outer.jpg"));
    assert!(body.contains("inner.mp4"));
    assert!(!body.contains("{ITEMS_"));
}

#[tokio::test]
async fn test_cyclic_playlist_still_serves_an_index() {
    let harness = TestHarness::new();
    let playlist = harness.seed_playlist(PlaylistMode::Master, "<img src=\"loop.jpg\"/>\n", "", "");
    let conn = playout_db::pool::get_conn(&harness.db).unwrap();
    playout_db::queries::playlists::set_content(
        &conn,
        playlist,
        &playout_db::models::PlaylistContent {
            items: format!("<img src=\"loop.jpg\"/>\n{{ITEMS_{}}}\n", playlist),
            ..Default::default()
        },
    )
    .unwrap();
    drop(conn);
    harness.seed_player(GARLIC_UUID, PlayerStatus::Released, Some(playlist));

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("<smil"));
    assert!(!body.contains("loop.jpg"));
}

#[tokio::test]
async fn test_multizone_index_has_one_region_per_zone() {
    let harness = TestHarness::new();
    let left = harness.seed_playlist(PlaylistMode::Internal, "<img src=\"left.jpg\" region=\"screen\"/>\n", "", "");
    let right = harness.seed_playlist(PlaylistMode::Internal, "<img src=\"right.jpg\" region=\"screen\"/>\n", "", "");
    let multizone = harness.seed_playlist(PlaylistMode::Multizone, "", "", "");
    harness.seed_zones(
        multizone,
        &Zones {
            export_unit: ExportUnit::Pixel,
            screen_width: 1920,
            screen_height: 1080,
            zones: vec![zone("left", 0, 960, left), zone("right", 960, 960, right)],
        },
    );
    harness.seed_player(GARLIC_UUID, PlayerStatus::Released, Some(multizone));

    let response = harness.poll(Some(GARLIC_UA), None).await;
    let body = body_to_string(response.into_body()).await;

    assert!(body.contains("regionName=\"screen1\""));
    assert!(body.contains("regionName=\"screen2\""));
    assert!(body.contains("<img src=\"left.jpg\" region=\"screen1\"/>"));
    assert!(body.contains("<img src=\"right.jpg\" region=\"screen2\"/>"));
}

fn zone(name: &str, left: u32, width: u32, playlist: PlaylistId) -> Zone {
    Zone {
        zone_name: name.to_string(),
        zone_left: left,
        zone_top: 0,
        zone_width: width,
        zone_height: 1080,
        zone_z_index: 0,
        zone_bgcolor: "transparent".to_string(),
        zone_playlist_id: playlist,
    }
}

// ---------------------------------------------------------------------------
// Fixtures & failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_released_without_playlist_gets_fixture() {
    let harness = TestHarness::new();
    harness.seed_player(GARLIC_UUID, PlayerStatus::Released, None);

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let expected = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/resources/smil/released_no_playlist.smil"
    ))
    .unwrap();
    assert_eq!(body_to_string(response.into_body()).await, expected);
}

#[tokio::test]
async fn test_simulation_fixture_is_served() {
    let harness = TestHarness::new();
    harness.seed_player(GARLIC_UUID, PlayerStatus::TestSmilOk, None);

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_to_string(response.into_body()).await.contains("Test: valid index"));
}

#[tokio::test]
async fn test_exception_status_falls_back() {
    let harness = TestHarness::new();
    harness.seed_player(GARLIC_UUID, PlayerStatus::TestException, None);

    let response = harness.poll(Some(GARLIC_UA), None).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(response.headers().contains_key(header::EXPIRES));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=31536000");
}
