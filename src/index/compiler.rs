//! Index compilation.
//!
//! One compilation builds the player's playlist, selects the template for the
//! device family, prepares every section, renders and publishes. Content
//! failures degrade to empty fragments; a render failure reaches the
//! publisher as empty content so the previous index keeps being served.

use playout_common::{Error, Player, Result};
use playout_smil::sections::SubscriptionTargets;
use playout_smil::{
    select_template, ContentResolver, PlaylistBuilderFactory, PreparerFactory, SectionRenderer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::publisher::{IndexPublisher, PublishOutcome};

pub struct IndexCompiler {
    index_dir: PathBuf,
    builders: PlaylistBuilderFactory,
    renderer: Arc<dyn SectionRenderer>,
    publisher: Arc<IndexPublisher>,
    targets: SubscriptionTargets,
}

impl IndexCompiler {
    pub fn new(
        index_dir: impl Into<PathBuf>,
        resolver: ContentResolver,
        renderer: Arc<dyn SectionRenderer>,
        targets: SubscriptionTargets,
    ) -> Self {
        Self {
            index_dir: index_dir.into(),
            builders: PlaylistBuilderFactory::new(resolver),
            renderer,
            publisher: Arc::new(IndexPublisher::new()),
            targets,
        }
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// `<index_dir>/<uuid>/<playlist_id>.smil`
    pub fn index_path(&self, player: &Player) -> Result<PathBuf> {
        if !is_safe_segment(&player.uuid) {
            return Err(Error::invalid_input(format!("unusable player uuid: {:?}", player.uuid)));
        }
        Ok(self
            .index_dir
            .join(&player.uuid)
            .join(format!("{}.smil", player.playlist_id)))
    }

    /// Compile and publish the player's index, returning its path.
    pub async fn compile(&self, player: &Player) -> Result<PathBuf> {
        let path = self.index_path(player)?;
        let content = self.render(player).await;

        let publisher = self.publisher.clone();
        let target = path.clone();
        let outcome = tokio::task::spawn_blocking(move || publisher.publish(&target, &content))
            .await
            .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))??;

        match outcome {
            PublishOutcome::Written => tracing::info!(uuid = %player.uuid, path = %path.display(), "Published index"),
            PublishOutcome::Unchanged | PublishOutcome::Stale => {
                tracing::debug!(uuid = %player.uuid, ?outcome, "Index not rewritten")
            }
        }

        Ok(path)
    }

    /// Render the index document; empty when rendering fails.
    pub async fn render(&self, player: &Player) -> String {
        let playlist = self.builders.create(player).build_playlist().await;
        let template = select_template(player.model, &player.firmware);
        let today = chrono::Local::now().date_naive();

        tracing::debug!(
            uuid = %player.uuid,
            playlist_id = %player.playlist_id,
            mode = %player.playlist_mode,
            template = %template,
            "Compiling index"
        );

        let data = PreparerFactory::new(
            player,
            &playlist,
            &self.targets,
            !template.supports_prefetch(),
            today,
        )
        .prepare_all();

        match self.renderer.render(template.name(), &data) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(uuid = %player.uuid, template = %template, "Failed to render index: {}", e);
                String::new()
            }
        }
    }
}

/// A uuid may only become a single path component.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use playout_common::{PlayerModel, PlayerStatus, PlaylistId};
    use playout_smil::{BlockRenderer, ContentReader, ExternalContentReader, ResolverLimits, SectionData};

    struct StaticReader;

    #[async_trait]
    impl ContentReader for StaticReader {
        async fn load_items(&self, id: PlaylistId) -> Result<String> {
            Ok(format!("\t\t\t\t<img src=\"{}.jpg\" region=\"screen\" dur=\"10s\"/>\n", id))
        }

        async fn load_prefetch(&self, id: PlaylistId) -> Result<String> {
            Ok(format!("\t\t\t\t\t<prefetch src=\"{}.jpg\"/>\n", id))
        }

        async fn load_exclusive(&self, _id: PlaylistId) -> Result<String> {
            Ok(String::new())
        }
    }

    struct NoExternal;

    #[async_trait]
    impl ExternalContentReader for NoExternal {
        async fn load_items(&self, url: &str) -> Result<String> {
            Err(Error::external(url))
        }
    }

    struct FailingRenderer;

    impl SectionRenderer for FailingRenderer {
        fn render(&self, _template: &str, _data: &SectionData) -> Result<String> {
            Err(Error::render("broken"))
        }
    }

    fn compiler(dir: &Path, renderer: Arc<dyn SectionRenderer>) -> IndexCompiler {
        let resolver = ContentResolver::new(Arc::new(StaticReader), Arc::new(NoExternal), ResolverLimits::default());
        IndexCompiler::new(
            dir,
            resolver,
            renderer,
            SubscriptionTargets::new("http://hub/smil-index", "http://hub/reports"),
        )
    }

    fn player() -> Player {
        Player {
            uuid: "abc-123".to_string(),
            name: "Lobby".to_string(),
            firmware: "1.0.0.745".to_string(),
            model: PlayerModel::Garlic,
            status: PlayerStatus::Released,
            playlist_id: PlaylistId::from(7),
            playlist_name: "Menu".to_string(),
            duration: 120,
            ..Player::default()
        }
    }

    #[tokio::test]
    async fn test_compile_publishes_index() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path(), Arc::new(BlockRenderer::new()));

        let path = compiler.compile(&player()).await.unwrap();
        assert_eq!(path, dir.path().join("abc-123").join("7.smil"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<title>Lobby - Menu</title>"));
        assert!(content.contains("<img src=\"7.jpg\" region=\"screen\" dur=\"10s\"/>"));
        assert!(content.contains("<prefetch src=\"7.jpg\"/>"));
        assert!(content.contains("dur=\"1800\""));
    }

    #[tokio::test]
    async fn test_simple_template_omits_prefetch() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path(), Arc::new(BlockRenderer::new()));
        let player = Player {
            model: PlayerModel::IadeaXmp1x0,
            ..player()
        };

        let content = compiler.render(&player).await;
        assert!(content.contains("<img src=\"7.jpg\""));
        assert!(!content.contains("prefetch"));
    }

    #[tokio::test]
    async fn test_render_failure_without_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path(), Arc::new(FailingRenderer));

        let err = compiler.compile(&player()).await.unwrap_err();
        assert!(matches!(err, Error::NoIndex(_)));
    }

    #[tokio::test]
    async fn test_render_failure_keeps_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let good = compiler(dir.path(), Arc::new(BlockRenderer::new()));
        let path = good.compile(&player()).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let broken = compiler(dir.path(), Arc::new(FailingRenderer));
        assert_eq!(broken.compile(&player()).await.unwrap(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_rejects_path_like_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler(dir.path(), Arc::new(BlockRenderer::new()));

        for uuid in ["", "..", "../etc", "a/b"] {
            let player = Player {
                uuid: uuid.to_string(),
                ..player()
            };
            assert!(compiler.index_path(&player).is_err(), "{:?}", uuid);
        }
    }
}
