use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    api::{DrawSource, Game},
    config::SourceConfig,
    models::DrawRecord,
};

/// Results endpoint of the national lottery site.
#[derive(Debug, Clone)]
pub struct NationalLotteryProvider {
    client: reqwest::Client,
    url: String,
    game: Game,
}

impl NationalLotteryProvider {
    pub fn new(client: reqwest::Client, url: impl Into<String>, game: Game) -> Self {
        Self {
            client,
            url: url.into(),
            game,
        }
    }

    pub fn from_config(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = super::build_client(config.timeout())?;
        Ok(Self::new(client, config.url.clone(), config.game))
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// Request one draw and return the raw response.
    pub async fn get_draw_details(&self, draw_number: u32) -> anyhow::Result<DrawDetailsResponse> {
        let params = DrawDetailsRequest::new(self.game, draw_number);

        let resp = self.client.post(&self.url).form(&params).send().await;

        let response = match resp {
            Ok(response) => {
                if response.status().is_success() {
                    response
                } else {
                    let error_message = format!(
                        "DrawDetailsRequest for draw #{draw_number} failed with status: {}",
                        response.status()
                    );
                    let text = response.text().await.unwrap_or_default();
                    log::debug!("{error_message}\n==== Response: ====\n {text}");
                    return Err(anyhow::anyhow!("{error_message}"));
                }
            }
            Err(e) => return Err(anyhow::anyhow!("Request for draw #{draw_number} failed: {e}")),
        };

        let response_text = response.text().await?;

        serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON response for draw #{draw_number}: {e}"))
    }
}

impl DrawSource for NationalLotteryProvider {
    async fn fetch_draw(&self, draw_number: u32) -> anyhow::Result<DrawRecord> {
        let record = self.get_draw_details(draw_number).await?.into_record()?;
        if record.draw_number != draw_number {
            anyhow::bail!(
                "Requested draw #{draw_number} but the response holds draw #{}",
                record.draw_number
            );
        }
        Ok(record)
    }
}

#[derive(Debug, Serialize)]
struct DrawDetailsRequest {
    #[serde(rename = "gameName")]
    game_name: String,
    #[serde(rename = "drawNumber")]
    draw_number: String,
    #[serde(rename = "isAjax")]
    is_ajax: &'static str,
}

impl DrawDetailsRequest {
    fn new(game: Game, draw_number: u32) -> Self {
        Self {
            game_name: game.to_string(),
            draw_number: draw_number.to_string(),
            is_ajax: "true",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DrawDetailsResponse {
    data: DrawDetailsData,
}

#[derive(Debug, Deserialize)]
struct DrawDetailsData {
    /// Key order matters: values are mapped onto the record by position.
    #[serde(rename = "drawDetails")]
    draw_details: Map<String, Value>,
}

impl DrawDetailsResponse {
    pub fn into_record(self) -> anyhow::Result<DrawRecord> {
        let values: Vec<Value> = self.data.draw_details.into_iter().map(|(_, v)| v).collect();
        Ok(DrawRecord::from_json_fields(&values)?)
    }
}
