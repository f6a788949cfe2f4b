use super::{resolve_target, Session};
use crate::output::Output;
use crate::TitleArgs;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;
use watchlist_core::{view::toggle_label, AddOutcome, CardView, ToggleOutcome};
use watchlist_models::{Category, NewEntry};

fn candidate(args: TitleArgs) -> NewEntry {
    NewEntry::new(args.id, args.category, args.title)
        .with_poster(args.poster)
        .with_vote_average(args.vote)
}

fn card_json(session: &Session, id: u64, category: Category) -> serde_json::Value {
    session
        .store
        .get(id, category)
        .map(|entry| json!(CardView::new(entry, &session.display)))
        .unwrap_or(serde_json::Value::Null)
}

pub fn run_add(session: &mut Session, args: TitleArgs, output: &Output) -> Result<()> {
    let entry = candidate(args);
    let key = entry.key();
    let title = entry.title.clone();

    let outcome = session
        .store
        .add(entry)
        .wrap_err_with(|| format!("Failed to add {}", key))?;

    if output.is_json() {
        output.json(&json!({
            "type": "add",
            "key": key.to_string(),
            "added": outcome == AddOutcome::Added,
            "count": session.store.count(),
            "entry": card_json(session, key.id, key.category),
        }));
        return Ok(());
    }
    match outcome {
        AddOutcome::Added => output.success(format!("Added {} ({})", title, key)),
        AddOutcome::AlreadyPresent => output.info(format!("{} is already on the watchlist", key)),
    }
    Ok(())
}

pub fn run_remove(
    session: &mut Session,
    target: &str,
    category: Option<Category>,
    output: &Output,
) -> Result<()> {
    let key = resolve_target(target, category)?;
    let title = session.store.get(key.id, key.category).map(|e| e.title.clone());

    let removed = session
        .store
        .remove(key.id, key.category)
        .wrap_err_with(|| format!("Failed to remove {}", key))?;

    if output.is_json() {
        output.json(&json!({
            "type": "remove",
            "key": key.to_string(),
            "removed": removed,
            "count": session.store.count(),
        }));
        return Ok(());
    }
    match (removed, title) {
        (true, Some(title)) => output.success(format!("Removed {} ({})", title, key)),
        (true, None) => output.success(format!("Removed {}", key)),
        (false, _) => output.info(format!("{} is not on the watchlist", key)),
    }
    Ok(())
}

pub fn run_toggle(session: &mut Session, args: TitleArgs, output: &Output) -> Result<()> {
    let entry = candidate(args);
    let key = entry.key();
    let title = entry.title.clone();

    let outcome = session
        .store
        .toggle(entry)
        .wrap_err_with(|| format!("Failed to toggle {}", key))?;

    if output.is_json() {
        output.json(&json!({
            "type": "toggle",
            "key": key.to_string(),
            "present": outcome.is_present(),
            "label": toggle_label(outcome.is_present()),
            "count": session.store.count(),
        }));
        return Ok(());
    }
    match outcome {
        ToggleOutcome::Added => output.success(format!("Added {} ({})", title, key)),
        ToggleOutcome::Removed => output.success(format!("Removed {} ({})", title, key)),
    }
    Ok(())
}

pub fn run_check(
    session: &Session,
    target: &str,
    category: Option<Category>,
    output: &Output,
) -> Result<bool> {
    let key = resolve_target(target, category)?;
    let present = session.store.contains(key.id, key.category);

    if output.is_json() {
        output.json(&json!({
            "type": "check",
            "key": key.to_string(),
            "present": present,
            "label": toggle_label(present),
            "entry": card_json(session, key.id, key.category),
        }));
        return Ok(present);
    }
    if present {
        output.info(format!("{} is on the watchlist", key));
    } else {
        output.info(format!("{} is not on the watchlist", key));
    }
    Ok(present)
}

pub fn run_count(session: &Session, output: &Output) -> Result<()> {
    let groups = session.store.groups();
    if output.is_json() {
        output.json(&json!({
            "type": "count",
            "count": session.store.count(),
            "movies": groups.movies.len(),
            "tv": groups.tv.len(),
        }));
        return Ok(());
    }
    output.info(session.store.count().to_string());
    Ok(())
}
