use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

use flotteq_core::{BookingWizard, ServiceContext, SlotRefresh, WizardStep};

use super::build_client;

#[derive(Args)]
pub struct BookArgs {
    #[arg(short, long, help = "Partner id")]
    pub partner: String,

    #[arg(short, long, help = "Service id")]
    pub service: String,

    #[arg(long, help = "Partner display name (defaults to the id)")]
    pub partner_name: Option<String>,

    #[arg(long, help = "Service display name (defaults to the id)")]
    pub service_name: Option<String>,

    #[arg(short, long, help = "Vehicle id (optional when you own exactly one)")]
    pub vehicle: Option<String>,

    #[arg(short, long, help = "Date (YYYY-MM-DD), defaults to today")]
    pub date: Option<NaiveDate>,

    #[arg(long, help = "Slot start time (HH:MM)")]
    pub slot: Option<String>,

    #[arg(short, long, help = "Notes forwarded to the partner")]
    pub notes: Option<String>,

    #[arg(long, default_value_t = 30, help = "Service duration in minutes")]
    pub duration: u32,
}

pub async fn handle_book_command(args: BookArgs) -> Result<()> {
    let (_config, client) = build_client()?;

    let context = ServiceContext::new(
        &args.partner,
        &args.service,
        args.duration,
        args.partner_name.clone().unwrap_or_else(|| args.partner.clone()),
        args.service_name.clone().unwrap_or_else(|| args.service.clone()),
    );

    let wizard = BookingWizard::new(
        context,
        client.clone(),
        client.clone(),
        client,
    );

    // Step 1: vehicle selection (skipped automatically for a single vehicle)
    println!("{}", "Booking a service".cyan().bold());
    println!();

    let vehicles = wizard.open().await?;

    if wizard.step().await == WizardStep::VehicleSelection {
        if vehicles.is_empty() {
            println!("{}", "No vehicles registered.".yellow());
            println!("Add a vehicle to your account before booking a service.");
            return Ok(());
        }

        match &args.vehicle {
            Some(id) => {
                if let Err(err) = wizard.select_vehicle(id).await {
                    print_vehicles(&vehicles);
                    return Err(err.into());
                }
            }
            None => {
                println!("{}", "Several vehicles on this account:".yellow());
                print_vehicles(&vehicles);
                println!();
                println!("Re-run with {} to pick one.", "--vehicle <id>".cyan().bold());
                return Ok(());
            }
        }
        wizard.advance().await?;
    } else if let Some(vehicle) = wizard.selected_vehicle().await {
        println!(
            "  {} Only vehicle {} selected automatically",
            "→".blue(),
            vehicle.display_label()
        );
    }

    // Step 2: date and slot
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    println!("  {} Checking availability for {}", "→".blue(), date);

    let windows = match wizard.show_date(date).await? {
        SlotRefresh::Loaded(windows) => windows,
        SlotRefresh::Discarded => Vec::new(),
    };

    if windows.is_empty() {
        println!();
        println!("{}", "No availability for this date.".yellow());
        println!("Try another date with {}.", "--date YYYY-MM-DD".cyan().bold());
        return Ok(());
    }

    let window = match &args.slot {
        Some(start) => {
            let start: NaiveTime = NaiveTime::parse_from_str(start, "%H:%M")
                .map_err(|e| anyhow::anyhow!("Invalid --slot '{}': {}", start, e))?;
            match windows.iter().find(|w| w.start == start) {
                Some(window) => *window,
                None => {
                    print_windows(&windows);
                    anyhow::bail!("Slot {} is not available on {}", start.format("%H:%M"), date);
                }
            }
        }
        None => {
            print_windows(&windows);
            println!();
            println!("Re-run with {} to pick one.", "--slot HH:MM".cyan().bold());
            return Ok(());
        }
    };

    wizard.choose_slot(window).await?;
    wizard.advance().await?;

    // Step 3: summary and confirmation
    if let Some(notes) = &args.notes {
        wizard.set_notes(notes).await?;
    }

    let draft = wizard.draft().await;
    let context = wizard.context();

    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<10} {}", "Partner:".bold(), context.partner_name);
    println!("  {:<10} {}", "Service:".bold(), context.service_name);
    if let Some(vehicle) = wizard.selected_vehicle().await {
        println!("  {:<10} {}", "Vehicle:".bold(), vehicle.display_label());
    }
    println!("  {:<10} {}", "Date:".bold(), date);
    println!("  {:<10} {}", "Time:".bold(), window);
    if !draft.notes.trim().is_empty() {
        println!("  {:<10} {}", "Notes:".bold(), draft.notes.trim());
    }
    println!();

    println!("  {} Confirming booking...", "→".blue());
    match wizard.confirm().await {
        Ok(booking) => {
            println!();
            println!(
                "{} Booking {} created ({})",
                "✓".green().bold(),
                booking.id.to_string().cyan(),
                booking.status
            );
            Ok(())
        }
        Err(err) => {
            let message = wizard
                .last_error()
                .await
                .unwrap_or_else(|| err.to_string());
            println!();
            println!("{} {}", "✗".red().bold(), message.red());
            println!("Your selections are unchanged; re-run to try another slot.");
            Err(err.into())
        }
    }
}

fn print_vehicles(vehicles: &[flotteq_core::Vehicle]) {
    for vehicle in vehicles {
        println!("  {} {}", vehicle.id.cyan(), vehicle.display_label());
    }
}

fn print_windows(windows: &[flotteq_core::SlotWindow]) {
    println!();
    println!("{}", "Available windows:".yellow());
    for window in windows {
        println!("  {}", window.to_string().cyan());
    }
}
