//! Surprise command - a random handful of restaurants

use anyhow::Result;
use colored::Colorize;

use super::{get_context, log_command};
use crate::output;
use restopick_core::EntryPoint;

pub fn run(n: Option<usize>, seed: Option<u64>, json: bool) -> Result<()> {
    let mut ctx = get_context(EntryPoint::Cli)?;
    log_command(&ctx, "surprise");

    if let Some(seed) = seed {
        ctx.picker.reseed(seed);
    }
    let n = n.unwrap_or(ctx.config.serendipity_count);
    let picks = ctx.picker.sample_serendipity(n);

    if json {
        println!("{}", serde_json::to_string_pretty(&picks)?);
        return Ok(());
    }

    println!("{}", "Feeling adventurous?".bold());
    println!("{}", output::restaurant_table(&picks));
    Ok(())
}
