//! SQLite-backed collaborators of the index compiler.
//!
//! rusqlite is blocking, so every query runs on the blocking pool.

use async_trait::async_trait;
use playout_common::{Error, Player, PlaylistId, Result};
use playout_db::models::PlaylistContent;
use playout_db::pool::{get_conn, DbPool};
use playout_db::queries::{players, playlists};
use playout_smil::ContentReader;
use rusqlite::Connection;

use crate::identity::PlayerIdentity;

/// Lookup and registration of player devices.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Player>>;

    /// Store a newly seen device as unregistered and return it.
    async fn register(&self, identity: &PlayerIdentity) -> Result<Player>;

    /// Record a poll from a known device.
    async fn touch(&self, identity: &PlayerIdentity) -> Result<()>;
}

async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = get_conn(&pool)?;
        f(&conn)
    })
    .await
    .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))?
}

#[derive(Clone)]
pub struct SqlitePlayerRepository {
    pool: DbPool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Player>> {
        let uuid = uuid.to_string();
        with_conn(&self.pool, move |conn| players::get_player(conn, &uuid)).await
    }

    async fn register(&self, identity: &PlayerIdentity) -> Result<Player> {
        let identity = identity.clone();
        with_conn(&self.pool, move |conn| {
            players::register_player(
                conn,
                &identity.uuid,
                &identity.name,
                &identity.firmware,
                identity.model,
            )
        })
        .await
    }

    async fn touch(&self, identity: &PlayerIdentity) -> Result<()> {
        let identity = identity.clone();
        with_conn(&self.pool, move |conn| {
            players::touch_player(conn, &identity.uuid, &identity.firmware, identity.model)
        })
        .await
    }
}

/// Playlist markup stored alongside the playlists.
#[derive(Clone)]
pub struct SqliteContentReader {
    pool: DbPool,
}

impl SqliteContentReader {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn content(&self, id: PlaylistId) -> Result<PlaylistContent> {
        with_conn(&self.pool, move |conn| {
            playlists::get_content(conn, id)?
                .ok_or_else(|| Error::not_found(format!("playlist {}", id)))
        })
        .await
    }
}

#[async_trait]
impl ContentReader for SqliteContentReader {
    async fn load_items(&self, id: PlaylistId) -> Result<String> {
        Ok(self.content(id).await?.items)
    }

    async fn load_prefetch(&self, id: PlaylistId) -> Result<String> {
        Ok(self.content(id).await?.prefetch)
    }

    async fn load_exclusive(&self, id: PlaylistId) -> Result<String> {
        Ok(self.content(id).await?.exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playout_common::{PlayerModel, PlayerStatus, PlaylistMode};
    use playout_db::pool::init_memory_pool;

    fn identity(uuid: &str) -> PlayerIdentity {
        PlayerIdentity {
            uuid: uuid.to_string(),
            name: "Lobby".to_string(),
            platform: "garlic-linux".to_string(),
            firmware: "1.0.0.745".to_string(),
            model_token: "Garlic".to_string(),
            model: PlayerModel::Garlic,
        }
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let repo = SqlitePlayerRepository::new(init_memory_pool().unwrap());

        assert!(repo.find_by_uuid("abc").await.unwrap().is_none());

        let player = repo.register(&identity("abc")).await.unwrap();
        assert_eq!(player.uuid, "abc");
        assert_eq!(player.name, "Lobby");
        assert_eq!(player.status, PlayerStatus::Unregistered);

        let found = repo.find_by_uuid("abc").await.unwrap().unwrap();
        assert_eq!(found, player);
    }

    #[tokio::test]
    async fn test_touch_updates_firmware() {
        let repo = SqlitePlayerRepository::new(init_memory_pool().unwrap());
        repo.register(&identity("abc")).await.unwrap();

        let mut updated = identity("abc");
        updated.firmware = "1.0.0.801".to_string();
        repo.touch(&updated).await.unwrap();

        let found = repo.find_by_uuid("abc").await.unwrap().unwrap();
        assert_eq!(found.firmware, "1.0.0.801");
    }

    #[tokio::test]
    async fn test_content_reader() {
        let pool = init_memory_pool().unwrap();
        let id = {
            let conn = pool.get().unwrap();
            let playlist = playlists::create_playlist(&conn, "Menu", PlaylistMode::Master, 60).unwrap();
            playlists::set_content(
                &conn,
                playlist.id,
                &PlaylistContent {
                    items: "<img/>".to_string(),
                    prefetch: "<prefetch/>".to_string(),
                    exclusive: String::new(),
                },
            )
            .unwrap();
            playlist.id
        };

        let reader = SqliteContentReader::new(pool);
        assert_eq!(reader.load_items(id).await.unwrap(), "<img/>");
        assert_eq!(reader.load_prefetch(id).await.unwrap(), "<prefetch/>");
        assert_eq!(reader.load_exclusive(id).await.unwrap(), "");

        let err = reader.load_items(PlaylistId::from(999)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
