use super::prompts::prompt_yes_no;
use super::Session;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;

pub fn run_clear(session: &mut Session, yes: bool, output: &Output) -> Result<()> {
    let count = session.store.count();

    if count == 0 && !output.is_json() {
        output.info("Watchlist is already empty");
    }

    if count > 0 && !yes {
        let prompt = format!("Remove all {} entries from the watchlist?", count);
        if !prompt_yes_no(&prompt, false)? {
            output.warn("Clear cancelled");
            return Ok(());
        }
    }

    session
        .store
        .clear()
        .wrap_err_with(|| format!("Failed to clear watchlist in {}", session.location))?;

    if output.is_json() {
        output.json(&json!({ "type": "clear", "removed": count }));
    } else if count > 0 {
        output.success(format!("Cleared {} entries from {}", count, session.location));
    }
    Ok(())
}
