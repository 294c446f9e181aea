//! Groups command - who is going where

use anyhow::Result;
use colored::Colorize;

use super::get_demo_session;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_demo_session("groups")?;
    let groups = ctx.picker.list_groups();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        output::info("No groups have formed yet.");
        return Ok(());
    }

    println!("{}", "Groups".bold());
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Restaurant", "Votes", "Colleagues"]);
    for group in &groups {
        let names: Vec<&str> = group.colleagues.iter().map(|c| c.name.as_str()).collect();
        table.add_row(vec![
            group.restaurant.id.clone(),
            group.restaurant.name.clone(),
            group.count.to_string(),
            names.join(", "),
        ]);
    }
    println!("{}", table);

    Ok(())
}
