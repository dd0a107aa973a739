use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use flotteq_core::VehicleProvider;

use super::build_client;

pub async fn handle_vehicles_command(format: &str) -> Result<()> {
    let (_config, client) = build_client()?;

    let vehicles = client.list_vehicles().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&vehicles)?);
        return Ok(());
    }

    if vehicles.is_empty() {
        println!("{}", "No vehicles registered.".yellow());
        println!();
        println!("Add a vehicle to your account before booking a service.");
        return Ok(());
    }

    println!("{}", "Your Vehicles".cyan().bold());
    println!("{}", "═".repeat(50).dimmed());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id").fg(comfy_table::Color::Cyan),
            Cell::new("Brand").fg(comfy_table::Color::Cyan),
            Cell::new("Model").fg(comfy_table::Color::Cyan),
            Cell::new("Registration").fg(comfy_table::Color::Cyan),
        ]);

    for vehicle in &vehicles {
        table.add_row(vec![
            Cell::new(&vehicle.id),
            Cell::new(&vehicle.brand),
            Cell::new(&vehicle.model),
            Cell::new(&vehicle.registration),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} vehicle(s)", vehicles.len());

    Ok(())
}
