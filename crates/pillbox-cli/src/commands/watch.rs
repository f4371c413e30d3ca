//! Live Today view, refreshed on the clock tick.

use pillbox_core::{Config, RefreshTimer};
use std::time::Duration;

use super::open_app;
use super::view::render_today;

pub fn run(interval: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let period = match interval {
        Some(secs) => Duration::from_secs(secs.max(1)),
        None => config.refresh_interval(),
    };
    let mut app = open_app(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut timer = RefreshTimer::start(period);
        print!("{}", render_today(&app));

        loop {
            tokio::select! {
                tick = timer.tick() => {
                    if tick.is_none() {
                        break;
                    }
                    app.tick();
                    println!("---");
                    print!("{}", render_today(&app));
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("watch interrupted");
                    break;
                }
            }
        }
    });
    Ok(())
}
