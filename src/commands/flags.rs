//! Print the vote-map settings

use std::io::Write;

use anyhow::Result;
use rcon_rotation::{RemoteStore, SyncController, VoteMapConfig};

pub async fn handle<S: RemoteStore, W: Write>(controller: &SyncController<S>, output: &mut W) -> Result<()> {
    let config = controller.refresh_votemap().await?;
    write_votemap(output, &config)
}

pub(crate) fn write_votemap<W: Write>(output: &mut W, config: &VoteMapConfig) -> Result<()> {
    writeln!(output, "enabled: {}", config.enabled)?;
    writeln!(
        output,
        "options: {} (warfare {}, offensive {}, skirmish {})",
        config.total_options(),
        config.num_warfare_options,
        config.num_offensive_options,
        config.num_skirmish_control_options
    )?;
    writeln!(output, "excluded recent maps: {}", config.number_last_played_to_exclude)?;
    if !config.default_method.is_empty() {
        writeln!(output, "default method: {}", config.default_method)?;
    }
    Ok(())
}
