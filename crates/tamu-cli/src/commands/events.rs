// Events commands - list and inspect events

use anyhow::Result;
use clap::Subcommand;
use serde::Deserialize;

use tamu_core::{Event, ListResponse};

use crate::client::Client;
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List events, newest date first
    List {
        #[arg(long, default_value = "1")]
        page: i64,

        #[arg(long, default_value = "20")]
        page_size: i64,
    },

    /// Show one event by slug
    Get {
        /// Event slug
        slug: String,
    },

    /// Show attendance statistics for one event
    Stats {
        /// Event ID
        id: i64,
    },
}

#[derive(Debug, Deserialize, serde::Serialize)]
struct StatsResponse {
    event: Event,
    stats: tamu_core::EventStats,
    by_institution: Vec<tamu_core::InstitutionRollup>,
    by_category: Vec<tamu_core::CategoryRollup>,
}

pub async fn run(client: &Client, output: OutputFormat, command: EventsCommand) -> Result<()> {
    match command {
        EventsCommand::List { page, page_size } => {
            let events: ListResponse<Event> = client
                .get(&format!("/v1/events?page={page}&page_size={page_size}"))
                .await?;

            if output.is_text() {
                print_table_header(&[("ID", 6), ("SLUG", 36), ("DATE", 20), ("NAME", 40)]);
                for event in &events.data {
                    print_table_row(&[
                        (&event.id.to_string(), 6),
                        (&event.slug, 36),
                        (&event.date.format("%Y-%m-%d %H:%M").to_string(), 20),
                        (&event.name, 40),
                    ]);
                }
            } else {
                output.print_value(&events);
            }
        }

        EventsCommand::Get { slug } => {
            let event: Event = client.get(&format!("/v1/events/slug/{slug}")).await?;

            if output.is_text() {
                print_field("ID", &event.id.to_string());
                print_field("Name", &event.name);
                print_field("Slug", &event.slug);
                print_field("Date", &event.date.to_rfc3339());
                if let Some(location) = &event.location {
                    print_field("Location", location);
                }
                if let Some(description) = &event.description {
                    print_field("Description", description);
                }
            } else {
                output.print_value(&event);
            }
        }

        EventsCommand::Stats { id } => {
            let stats: StatsResponse = client.get(&format!("/v1/events/{id}/stats")).await?;

            if output.is_text() {
                print_field("Event", &stats.event.name);
                print_field("Attendees", &stats.stats.total_attendees.to_string());
                print_field("Institutions", &stats.stats.total_institutions.to_string());
                print_field("Represented", &stats.stats.total_represented.to_string());
                if !stats.by_institution.is_empty() {
                    println!();
                    print_table_header(&[("INSTITUTION", 40), ("GUESTS", 8), ("HEADS", 8)]);
                    for row in &stats.by_institution {
                        print_table_row(&[
                            (&row.institution, 40),
                            (&row.attendee_count.to_string(), 8),
                            (&row.total_represented.to_string(), 8),
                        ]);
                    }
                }
            } else {
                output.print_value(&stats);
            }
        }
    }

    Ok(())
}
