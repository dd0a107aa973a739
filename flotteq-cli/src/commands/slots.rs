use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use flotteq_core::{SlotProvider, SlotQuery};

use super::build_client;

#[derive(Args)]
pub struct SlotsArgs {
    #[arg(short, long, help = "Partner id")]
    pub partner: String,

    #[arg(short, long, help = "Service id")]
    pub service: String,

    #[arg(short, long, help = "Date (YYYY-MM-DD), defaults to today")]
    pub date: Option<NaiveDate>,

    #[arg(long, default_value_t = 30, help = "Service duration in minutes")]
    pub duration: u32,

    #[arg(
        short,
        long,
        default_value = "text",
        help = "Output format (text, json)"
    )]
    pub format: String,
}

pub async fn handle_slots_command(args: SlotsArgs) -> Result<()> {
    let (_config, client) = build_client()?;

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let query = SlotQuery {
        partner_id: args.partner.clone(),
        service_id: args.service.clone(),
        date,
        duration_minutes: args.duration,
    };

    let slots = client.list_slots(&query).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&slots)?);
        return Ok(());
    }

    println!("{}", "Slot Availability".cyan().bold());
    println!(
        "Partner: {}  Service: {}  Date: {}",
        args.partner.yellow(),
        args.service.yellow(),
        date.to_string().yellow()
    );
    println!("{}", "═".repeat(50).dimmed());
    println!();

    if slots.is_empty() {
        println!("{}", "No availability for this date.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Window").fg(comfy_table::Color::Cyan),
            Cell::new("Status").fg(comfy_table::Color::Cyan),
        ]);

    let mut open = 0;
    for slot in &slots {
        let status = if slot.available {
            open += 1;
            Cell::new("available").fg(comfy_table::Color::Green)
        } else {
            Cell::new("taken").fg(comfy_table::Color::DarkGrey)
        };
        table.add_row(vec![Cell::new(slot.window.to_string()), status]);
    }

    println!("{table}");
    println!();
    println!("  {} of {} window(s) open", open, slots.len());

    Ok(())
}
