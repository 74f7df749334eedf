//! Riot account identity model.

use serde::{Deserialize, Serialize};

/// Response of the account-v1 by-riot-id lookup.
///
/// The PUUID is the stable upstream identity for a player; the echoed
/// game name and tag line are informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,

    #[serde(default)]
    pub game_name: String,

    #[serde(default)]
    pub tag_line: String,
}
