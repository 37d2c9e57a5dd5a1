//! List every map the server offers

use std::io::Write;

use anyhow::Result;
use rcon_rotation::{RemoteStore, SyncController};

pub async fn handle<S: RemoteStore, W: Write>(controller: &SyncController<S>, output: &mut W) -> Result<()> {
    let catalog = controller.load_catalog().await?;
    for item in &catalog {
        writeln!(output, "{:<40} {}", item.id, item.display_name())?;
    }
    writeln!(output, "{} map(s)", catalog.len())?;
    Ok(())
}
