pub mod edit;
pub mod flags;
pub mod init;
pub mod maps;
pub mod show;
pub mod watch;

use std::io::Write;

use anyhow::Result;
use rcon_rotation::Sequence;

/// Print a rotation with 1-based positions
pub(crate) fn write_rotation<W: Write>(output: &mut W, rotation: &Sequence) -> Result<()> {
    if rotation.is_empty() {
        writeln!(output, "(rotation is empty)")?;
        return Ok(());
    }
    for (position, item) in rotation.iter().enumerate() {
        writeln!(output, "{:>3}. {:<40} {}", position + 1, item.display_name(), item.id)?;
    }
    Ok(())
}

/// Convert an operator-facing 1-based position to an index
pub(crate) fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}
