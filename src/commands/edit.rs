//! Rotation edits: move, add, remove. Each one loads, edits, and saves.

use std::io::Write;

use anyhow::Result;
use rcon_rotation::{EditError, Item, RemoteStore, SaveOutcome, Sequence, SyncController};

use super::{to_index, write_rotation};

/// Move the map at position `from` to position `to` (1-based)
pub async fn handle_move<S: RemoteStore, W: Write>(
    controller: &SyncController<S>,
    output: &mut W,
    from: usize,
    to: usize,
) -> Result<()> {
    let (from, to) = (to_index(from)?, to_index(to)?);
    apply_and_save(controller, output, |c| c.reorder(from, to)).await
}

/// Append maps by id
pub async fn handle_add<S: RemoteStore, W: Write>(
    controller: &SyncController<S>,
    output: &mut W,
    ids: &[String],
) -> Result<()> {
    if ids.is_empty() {
        anyhow::bail!("No maps given to add");
    }
    apply_and_save(controller, output, |c| {
        if c.catalog().is_empty() {
            // No catalog to validate against; let the server decide.
            tracing::debug!("Map catalog is empty, adding ids as given");
            let items: Sequence = ids.iter().map(|id| Item::bare(id.clone())).collect();
            return Ok(c.append(&items));
        }
        c.add_from_catalog(ids)
    })
    .await
}

/// Remove the map at `position` (1-based)
pub async fn handle_remove<S: RemoteStore, W: Write>(
    controller: &SyncController<S>,
    output: &mut W,
    position: usize,
) -> Result<()> {
    let index = to_index(position)?;
    apply_and_save(controller, output, |c| c.remove_at(index)).await
}

async fn apply_and_save<S, W, F>(controller: &SyncController<S>, output: &mut W, edit: F) -> Result<()>
where
    S: RemoteStore,
    W: Write,
    F: FnOnce(&SyncController<S>) -> Result<Sequence, EditError>,
{
    controller.refresh_all().await?;
    edit(controller)?;

    match controller.save().await? {
        SaveOutcome::Saved => {
            writeln!(output, "Rotation saved:")?;
            write_rotation(output, &controller.canonical())?;
            Ok(())
        }
        SaveOutcome::Skipped(reason) => anyhow::bail!("Rotation not saved: {}", reason),
        SaveOutcome::Discarded => anyhow::bail!("Rotation save was interrupted"),
    }
}
