use super::Session;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_core::{CardView, EMPTY_HINT, EMPTY_MESSAGE};
use watchlist_models::{Category, WatchlistEntry};

pub fn run_list(session: &Session, only: Option<Category>, output: &Output) -> Result<()> {
    let groups = session.store.groups();
    let selected: Vec<(Category, &[&WatchlistEntry])> = groups
        .non_empty()
        .filter(|(category, _)| only.map_or(true, |c| c == *category))
        .collect();

    if output.is_json() {
        let cards = |category: Category| -> Vec<CardView> {
            if only.map_or(false, |c| c != category) {
                return Vec::new();
            }
            groups
                .get(category)
                .iter()
                .map(|entry| CardView::new(entry, &session.display))
                .collect()
        };
        output.json(&json!({
            "type": "list",
            "count": session.store.count(),
            "movies": cards(Category::Movie),
            "tv": cards(Category::Tv),
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    if selected.is_empty() {
        println!("{}", EMPTY_MESSAGE.bold());
        println!("{}", EMPTY_HINT.dimmed());
        return Ok(());
    }

    for (category, entries) in selected {
        println!("\n{}", groups.heading(category).bright_cyan().bold());
        println!("{}", cards_table(entries, session));
    }
    Ok(())
}

fn cards_table(entries: &[&WatchlistEntry], session: &Session) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
        Cell::new("Added").add_attribute(Attribute::Bold),
        Cell::new("Poster").add_attribute(Attribute::Bold),
    ]);

    for entry in entries {
        let card = CardView::new(entry, &session.display);
        let added = entry
            .added_at_utc()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(card.key),
            Cell::new(card.display_title),
            Cell::new(card.rating.unwrap_or_default()),
            Cell::new(added),
            Cell::new(card.poster_url.unwrap_or_default()),
        ]);
    }
    table
}
