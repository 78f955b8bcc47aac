use anyhow::{Context as _, Result};
use console::{StyledObject, style};
use lotto_client::{
    LottoConfig,
    datastore::load_table,
    server::HttpServer,
    service::get_last_draw,
};
use lotto_stats::{BallColour, DrawBalls};

pub async fn serve(config: &LottoConfig) -> Result<()> {
    let table = load_table(&config.storage.data_path)?;
    match get_last_draw(&table) {
        Ok(last) => log::info!(
            "Last draw #{} on {}: {}",
            last.draw_number,
            last.draw_date,
            styled_balls(&last.balls)
        ),
        Err(e) => log::warn!("{e}"),
    }

    let server = HttpServer::new(table, &config.dashboard);
    let handle = server.start().await?;

    tokio::select! {
        joined = handle => {
            joined.context("HTTP server task failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            log::info!("Shutting down");
        }
    }
    Ok(())
}

fn styled_ball(ball: u8) -> StyledObject<String> {
    let text = style(format!("{ball:02}")).bold();
    match BallColour::for_number(ball) {
        BallColour::Red => text.red(),
        BallColour::Yellow => text.yellow(),
        BallColour::Green => text.green(),
        BallColour::Aqua => text.cyan(),
    }
}

fn styled_balls(balls: &DrawBalls) -> String {
    let main: Vec<String> = balls
        .main
        .iter()
        .map(|&b| styled_ball(b).to_string())
        .collect();
    format!("{} + {}", main.join(" "), styled_ball(balls.bonus))
}
