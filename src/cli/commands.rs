use crate::app::{AppContext, Result};
use crate::domain::ItemView;
use crate::store::Store;

pub async fn load(ctx: &AppContext) -> Result<()> {
    println!(
        "Fetching {} sections from {}...",
        ctx.config.feed.sections.len(),
        ctx.config.feed.source
    );

    let snapshot = ctx.composer.compose().await?;
    let ack = ctx.store.write(&snapshot).await?;

    for name in snapshot.section_names() {
        println!("  {}", name);
    }
    println!("Saved snapshot for {} ({})", ack.date_key, ack.url);
    Ok(())
}

pub async fn list_dates(ctx: &AppContext) -> Result<()> {
    let dates = newest_first(ctx.store.list_dates().await?);

    if dates.is_empty() {
        println!("No dates available");
        return Ok(());
    }

    for date in dates {
        println!("{}", date);
    }
    Ok(())
}

pub async fn list_sections(ctx: &AppContext, date: &str) -> Result<()> {
    let sections = ctx.store.list_sections(date).await?;

    if sections.is_empty() {
        println!("No sections available for {}", date);
        return Ok(());
    }

    for section in sections {
        println!("{}", section);
    }
    Ok(())
}

pub async fn list_items(ctx: &AppContext, date: &str, section: &str) -> Result<()> {
    let items = ctx.store.list_items(date, section).await?;

    if items.is_empty() {
        println!("No items for {} on {}", section, date);
        return Ok(());
    }

    for item in &items {
        let view = ItemView::from_node(item);
        let date = view.pub_date.as_deref().unwrap_or("");
        println!("{} {}", view.display_title(), date);
        if let Some(link) = &view.link {
            println!("  {}", link);
        }
    }
    Ok(())
}

/// `YYYY-MM-DD` keys sort chronologically as strings.
fn newest_first(mut dates: Vec<String>) -> Vec<String> {
    dates.sort_by(|a, b| b.cmp(a));
    dates
}
