//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a config pointing
//! at a temporary index directory and the bundled fixtures, and the full
//! [`AppContext`].

#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use playout::config::Config;
use playout::server::{create_router, AppContext};
use playout_common::{PlayerStatus, PlaylistId, PlaylistMode, Zones};
use playout_db::models::PlaylistContent;
use playout_db::pool::{get_conn, init_memory_pool, DbPool};
use playout_db::queries::{players, playlists};

pub const GARLIC_UA: &str =
    "GAPI/1.0 (UUID:a8294bat-c28f-50af-f94o-800869af5854; NAME:Lobby%20Screen) garlic-linux/v0.6.0.745 (MODEL:Garlic)";
pub const GARLIC_UUID: &str = "a8294bat-c28f-50af-f94o-800869af5854";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub index_dir: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness from `config`; index and fixture directories are
    /// always replaced with test locations.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let index_dir = dir.path().join("index");

        config.index.index_dir = index_dir.clone();
        config.index.fixtures_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/smil"));
        config.index.public_url = "http://hub.test/smil-index".to_string();
        config.reports.server_url = "http://hub.test/reports".to_string();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::from_config(config, db.clone()).expect("failed to build context");

        Self {
            ctx,
            db,
            index_dir,
            _dir: dir,
        }
    }

    /// Register a device and move it to `status`.
    pub fn seed_player(&self, uuid: &str, status: PlayerStatus, playlist: Option<PlaylistId>) {
        let conn = get_conn(&self.db).expect("failed to get connection");
        players::register_player(&conn, uuid, "Lobby Screen", "v0.6.0.745", playout_common::PlayerModel::Garlic)
            .expect("failed to register player");
        players::set_status(&conn, uuid, status).expect("failed to set status");
        if let Some(id) = playlist {
            players::assign_playlist(&conn, uuid, id).expect("failed to assign playlist");
        }
    }

    /// Create a playlist with stored markup.
    pub fn seed_playlist(&self, mode: PlaylistMode, items: &str, prefetch: &str, exclusive: &str) -> PlaylistId {
        let conn = get_conn(&self.db).expect("failed to get connection");
        let playlist = playlists::create_playlist(&conn, "Test playlist", mode, 300).expect("failed to create playlist");
        let content = PlaylistContent {
            items: items.to_string(),
            prefetch: prefetch.to_string(),
            exclusive: exclusive.to_string(),
        };
        playlists::set_content(&conn, playlist.id, &content).expect("failed to set content");
        playlist.id
    }

    pub fn seed_zones(&self, id: PlaylistId, zones: &Zones) {
        let conn = get_conn(&self.db).expect("failed to get connection");
        playlists::set_zones(&conn, id, zones).expect("failed to set zones");
    }

    pub fn player_status(&self, uuid: &str) -> Option<PlayerStatus> {
        let conn = get_conn(&self.db).expect("failed to get connection");
        players::get_player(&conn, uuid)
            .expect("failed to load player")
            .map(|p| p.status)
    }

    /// Poll the index route.
    pub async fn poll(&self, user_agent: Option<&str>, if_modified_since: Option<&str>) -> Response<Body> {
        let mut request = Request::get("/smil-index");
        if let Some(ua) = user_agent {
            request = request.header(header::USER_AGENT, ua);
        }
        if let Some(since) = if_modified_since {
            request = request.header(header::IF_MODIFIED_SINCE, since);
        }

        create_router(self.ctx.clone())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
