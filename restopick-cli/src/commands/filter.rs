//! Filter command - narrow the catalog down

use anyhow::{bail, Result};

use super::get_demo_session;
use crate::output;
use restopick_core::FilterCriteria;

pub fn run(
    cuisine: Option<String>,
    max_distance: Option<f64>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_demo_session("filter")?;

    let max_distance = max_distance.unwrap_or(ctx.config.default_max_distance);
    if !max_distance.is_finite() || max_distance < 0.0 {
        bail!("--max-distance must be a non-negative number");
    }

    let mut criteria = FilterCriteria::new(max_distance);
    if let Some(cuisine) = cuisine {
        if !ctx.picker.cuisines().contains(&cuisine) {
            output::warning(&format!(
                "No restaurant serves {} (known cuisines: {})",
                cuisine,
                ctx.picker.cuisines().join(", ")
            ));
        }
        criteria = criteria.with_cuisine(cuisine);
    }
    if let Some(search) = search {
        criteria = criteria.with_search(search);
    }

    let matches = ctx.picker.filter_restaurants(&criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        output::info("No restaurant matches these filters.");
        return Ok(());
    }

    println!("{}", output::restaurant_table(&matches));
    Ok(())
}
