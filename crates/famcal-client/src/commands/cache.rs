//! Holiday cache commands.

use crate::app::App;
use crate::commands::print_json;
use crate::error::ClientResult;

/// Lists the cached holiday keys.
pub fn keys(app: &App, json: bool) -> ClientResult<()> {
    let keys = app.cache().stored_keys();
    if json {
        return print_json(&keys);
    }
    if keys.is_empty() {
        println!("No cached holidays");
    } else {
        for key in keys {
            println!("{}", key);
        }
    }
    Ok(())
}

/// Removes every cached holiday list, leaving other stored data alone.
pub fn clear(app: &App) -> ClientResult<()> {
    let count = app.cache().stored_keys().len();
    app.cache().clear();
    println!("Cleared {} cached holiday list(s)", count);
    Ok(())
}
