use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use strum_macros::{Display, EnumIter};

use crate::models::DrawRecord;

pub mod national_lottery;

pub use national_lottery::NationalLotteryProvider;

/// Games served by the results endpoint. The `Display` form is the
/// `gameName` request parameter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Deserialize, Serialize, Default,
)]
pub enum Game {
    #[default]
    #[strum(to_string = "LOTTO")]
    #[serde(rename = "LOTTO")]
    Lotto,
    #[strum(to_string = "LOTTOPLUS")]
    #[serde(rename = "LOTTOPLUS")]
    LottoPlus,
    #[strum(to_string = "LOTTOPLUS2")]
    #[serde(rename = "LOTTOPLUS2")]
    LottoPlus2,
}

impl FromStr for Game {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::iter()
            .find(|game| game.to_string() == wanted)
            .ok_or_else(|| {
                let valid: Vec<String> = Self::iter().map(|g| g.to_string()).collect();
                format!("Invalid game: {s}. Valid games are: {valid:?}")
            })
    }
}

/// Anything that can produce one draw record by its number.
///
/// The collector only talks to this trait, so a run can be driven by the
/// HTTP provider in production and by a scripted source in tests.
#[expect(async_fn_in_trait)]
pub trait DrawSource {
    async fn fetch_draw(&self, draw_number: u32) -> anyhow::Result<DrawRecord>;
}

/// Build the HTTP client used for results requests.
pub fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}
