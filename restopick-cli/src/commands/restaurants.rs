//! Restaurants command - list the catalog

use anyhow::Result;
use colored::Colorize;

use super::{get_context, log_command};
use crate::output;
use restopick_core::EntryPoint;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context(EntryPoint::Cli)?;
    log_command(&ctx, "restaurants");
    let restaurants = ctx.picker.restaurants();

    if json {
        println!("{}", serde_json::to_string_pretty(restaurants)?);
        return Ok(());
    }

    println!("{}", "Restaurants".bold());
    println!("{}", output::restaurant_table(restaurants));
    println!();
    println!("{} restaurant(s) from the {} catalog", restaurants.len(), ctx.picker.source());

    Ok(())
}
