//! Print the current rotation

use std::io::Write;

use anyhow::Result;
use rcon_rotation::{RemoteStore, SyncController};

use super::write_rotation;

pub async fn handle<S: RemoteStore, W: Write>(controller: &SyncController<S>, output: &mut W) -> Result<()> {
    let (loaded, votemap) = tokio::join!(controller.load(), controller.refresh_votemap());
    loaded?;

    write_rotation(output, &controller.working())?;
    if let Ok(votemap) = votemap {
        if votemap.enabled {
            writeln!(output, "\nMap voting is enabled; the rotation is read-only.")?;
        }
    }
    Ok(())
}
