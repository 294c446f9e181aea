//! Trending command - most voted restaurants

use anyhow::Result;
use colored::Colorize;

use super::get_demo_session;
use crate::output;

pub fn run(n: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_demo_session("trending")?;
    let n = n.unwrap_or(ctx.config.trending_count);
    let trending = ctx.picker.list_trending(n);

    if json {
        println!("{}", serde_json::to_string_pretty(&trending)?);
        return Ok(());
    }

    if trending.is_empty() {
        output::info("No votes yet.");
        return Ok(());
    }

    println!("{}", "Trending".bold());
    println!("{}", output::ranked_table(&trending));

    Ok(())
}
