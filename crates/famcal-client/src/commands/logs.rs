//! Log journal commands.

use crate::app::App;
use crate::commands::print_json;
use crate::error::ClientResult;
use crate::render;

/// Shows the journal, optionally only the last `limit` entries.
pub fn show(app: &App, limit: Option<usize>, json: bool) -> ClientResult<()> {
    let mut entries = app.journal().entries();
    if let Some(limit) = limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    if json {
        print_json(&entries)
    } else {
        println!("{}", render::logs(&entries));
        Ok(())
    }
}

/// Removes every journal entry.
pub fn clear(app: &App) -> ClientResult<()> {
    app.journal().clear()?;
    println!("Log journal cleared");
    Ok(())
}
