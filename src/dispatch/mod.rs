//! Answering index polls.
//!
//! A poll is identified by its user agent, mapped to a stored player, and
//! answered according to the player's status. Every failure past
//! identification turns into the fallback response so a device keeps
//! playing what it already has.

pub mod response;
pub mod strategy;

pub use response::{IndexBody, IndexResponse};
pub use strategy::ServeStrategy;

use playout_common::{Error, Player, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::identity::PlayerIdentity;
use crate::index::IndexCompiler;
use crate::store::PlayerRepository;

pub struct Dispatcher {
    players: Arc<dyn PlayerRepository>,
    compiler: Arc<IndexCompiler>,
    fixtures_dir: PathBuf,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        compiler: Arc<IndexCompiler>,
        fixtures_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            players,
            compiler,
            fixtures_dir: fixtures_dir.into(),
            timeout,
        }
    }

    pub async fn dispatch(&self, user_agent: &str, if_modified_since: Option<&str>) -> IndexResponse {
        let identity = PlayerIdentity::from_user_agent(user_agent);
        if !identity.is_known() {
            tracing::warn!(user_agent, "Rejecting unidentified device");
            return IndexResponse::rejected();
        }

        match tokio::time::timeout(self.timeout, self.serve(&identity, if_modified_since)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(uuid = %identity.uuid, "Serving index failed: {}", e);
                IndexResponse::fallback()
            }
            Err(_) => {
                tracing::error!(uuid = %identity.uuid, timeout = ?self.timeout, "Serving index timed out");
                IndexResponse::fallback()
            }
        }
    }

    async fn serve(&self, identity: &PlayerIdentity, if_modified_since: Option<&str>) -> Result<IndexResponse> {
        let player = self.load_player(identity).await?;
        let strategy = ServeStrategy::for_player(&player);
        tracing::debug!(uuid = %player.uuid, status = %player.status, ?strategy, "Dispatching poll");

        let path = match strategy {
            ServeStrategy::Fixture(name) => self.fixtures_dir.join(name),
            ServeStrategy::Compile => self.compiler.compile(&player).await?,
            ServeStrategy::Fail(reason) => return Err(Error::status(reason)),
        };

        IndexResponse::for_file(&path, if_modified_since).await
    }

    /// The stored player as of this poll, registering unseen devices.
    async fn load_player(&self, identity: &PlayerIdentity) -> Result<Player> {
        match self.players.find_by_uuid(&identity.uuid).await? {
            Some(mut player) => {
                if player.firmware != identity.firmware || player.model != identity.model {
                    self.players.touch(identity).await?;
                    player.firmware = identity.firmware.clone();
                    player.model = identity.model;
                }
                Ok(player)
            }
            None => {
                tracing::info!(uuid = %identity.uuid, name = %identity.name, model = %identity.model, "Registering new player");
                self.players.register(identity).await
            }
        }
    }
}
