use playout_common::{Player, PlayerStatus};

pub const UNRELEASED: &str = "unreleased.smil";
pub const RELEASED_NO_PLAYLIST: &str = "released_no_playlist.smil";
pub const DEBUG_FTP: &str = "simulations/debug_ftp.smil";
pub const TEST_SMIL_OK: &str = "simulations/test_smil_ok.smil";
pub const TEST_SMIL_ERROR: &str = "simulations/test_smil_error.smil";
pub const TEST_NO_CONTENT: &str = "simulations/test_no_content.smil";
pub const TEST_NO_PREFETCH: &str = "simulations/test_no_prefetch.smil";

/// How a poll from a player is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeStrategy {
    /// Serve a static index relative to the fixtures directory.
    Fixture(&'static str),
    /// Compile the player's own index.
    Compile,
    /// Answer with the fallback response.
    Fail(String),
}

impl ServeStrategy {
    pub fn for_player(player: &Player) -> Self {
        match player.status {
            PlayerStatus::Unregistered | PlayerStatus::Unreleased => Self::Fixture(UNRELEASED),
            PlayerStatus::Released if player.playlist_id.is_assigned() => Self::Compile,
            PlayerStatus::Released => Self::Fixture(RELEASED_NO_PLAYLIST),
            PlayerStatus::DebugFtp => Self::Fixture(DEBUG_FTP),
            PlayerStatus::TestSmilOk => Self::Fixture(TEST_SMIL_OK),
            PlayerStatus::TestSmilError => Self::Fixture(TEST_SMIL_ERROR),
            PlayerStatus::TestNoContent => Self::Fixture(TEST_NO_CONTENT),
            PlayerStatus::TestNoPrefetch => Self::Fixture(TEST_NO_PREFETCH),
            PlayerStatus::TestException => Self::Fail("test exception requested".to_string()),
            PlayerStatus::Unknown(code) => Self::Fail(format!("unknown player status {}", code)),
        }
    }
}
