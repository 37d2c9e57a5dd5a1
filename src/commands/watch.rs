//! Follow vote-map changes until interrupted

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use rcon_rotation::{RemoteStore, SyncController};

use super::{flags::write_votemap, write_rotation};

pub async fn handle<S: RemoteStore, W: Write>(
    controller: &SyncController<S>,
    output: &mut W,
    period: Duration,
) -> Result<()> {
    controller.refresh_all().await?;
    write_rotation(output, &controller.working())?;
    writeln!(output)?;
    write_votemap(output, &controller.votemap())?;
    output.flush()?;

    let mut changes = controller.subscribe_votemap();
    controller.start_refresh(period);
    tracing::info!("Watching vote-map config every {:?}, press Ctrl-C to stop", period);

    loop {
        tokio::select! {
            changed = changes.changed() => {
                changed.context("Vote-map poller stopped")?;
                let config = changes.borrow_and_update().clone();
                writeln!(output, "\n[{}] vote-map config changed", chrono::Local::now().format("%H:%M:%S"))?;
                write_votemap(output, &config)?;
                output.flush()?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    controller.shutdown();
    Ok(())
}
