//! Headless duty-board client
//!
//! Starts the full data layer, prints the schedule once, and keeps the
//! roster warm until interrupted. With `--json` the screen payload is
//! emitted as JSON for scripting.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use watchbill_lib::commands::{schedule_screen, ScheduleScreen};
use watchbill_lib::context::AppContext;
use watchbill_lib::utils::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let context = Arc::new(AppContext::new().await?);

    // Wait for the first fetch so the printout is not the placeholder
    context.roster.roster_settled(&context.timezone).await;
    let screen = schedule_screen(&context, None, None).await;

    if std::env::args().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&screen)?);
    } else {
        render_screen(&screen);
    }

    info!("Keeping the roster warm; press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;

    context.shutdown().await?;
    Ok(())
}

fn render_screen(screen: &ScheduleScreen) {
    match screen.view.category.as_deref() {
        Some(category) => println!("{category} duty roster"),
        None => println!("duty roster (no categories configured)"),
    }
    if let Some(error) = &screen.error {
        println!("  last refresh failed: {error}");
    }
    for calendar in &screen.view.calendars {
        let current = calendar
            .current
            .as_ref()
            .map(|event| format!("{} until {}", event.person.display_name(), event.end))
            .unwrap_or_else(|| "nobody on call".to_string());
        println!("  {:<24} {}", calendar.name, current);
        if calendar.feed_stalled() {
            println!("    feed stalled since {}", calendar.last_update);
        }
    }
}
