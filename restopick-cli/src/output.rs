//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use restopick_core::{RankedRestaurant, Restaurant};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a distance in km the way the app displays it
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1} km", km)
    }
}

fn restaurant_cells(r: &Restaurant) -> Vec<String> {
    vec![
        r.id.clone(),
        r.name.clone(),
        r.cuisine.clone(),
        format_distance(r.distance),
        format!("{:.1}", r.rating),
        r.price_tier.to_string(),
    ]
}

/// Table of catalog entries
pub fn restaurant_table(restaurants: &[Restaurant]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Cuisine", "Distance", "Rating", "Price"]);
    for r in restaurants {
        table.add_row(restaurant_cells(r));
    }
    table
}

/// Table of catalog entries with their vote counts
pub fn ranked_table(ranked: &[RankedRestaurant]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Cuisine", "Distance", "Rating", "Price", "Votes"]);
    for entry in ranked {
        let mut cells = restaurant_cells(&entry.restaurant);
        cells.push(entry.count.to_string());
        table.add_row(cells);
    }
    table
}
