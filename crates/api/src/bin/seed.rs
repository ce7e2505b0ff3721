//! Seed the database with sample events.
//!
//! Usage: `seed [path-to-sample-json]` with `DATABASE_URL` set. Events need
//! an owner, so a locked service account is created on first run (its stored
//! "hash" can never verify, so it cannot log in).

use anyhow::Context;
use serde::Deserialize;

use orla_api::config::AppConfig;
use orla_auth::NewUser;
use orla_events::{NewEvent, parse_event_date};
use orla_infra::{EventStore, PostgresStore, UserStore};

const SEED_USERNAME: &str = "city-hall";

#[derive(Debug, Deserialize)]
struct SampleEvent {
    title: String,
    description: Option<String>,
    date: String,
    location: String,
    category: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orla_observability::init();

    let config = AppConfig::from_env();
    let url = config
        .database_url
        .context("DATABASE_URL must be set to seed")?;

    let store = PostgresStore::connect(&url)
        .await
        .context("connecting to database")?;
    store.migrate().await.context("running schema migration")?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sample_events.json".to_string());
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let samples: Vec<SampleEvent> = serde_json::from_str(&raw).context("parsing sample events")?;

    let owner = match UserStore::by_username(&store, SEED_USERNAME).await? {
        Some(user) => user,
        None => {
            UserStore::insert(
                &store,
                NewUser {
                    username: SEED_USERNAME.to_string(),
                    email: "events@city-hall.invalid".to_string(),
                    full_name: Some("City events office".to_string()),
                    // Not a valid PHC string: this account cannot log in.
                    password_hash: "!".to_string(),
                },
            )
            .await?
        }
    };

    let mut inserted = 0usize;
    for sample in samples {
        let date = parse_event_date(&sample.date)
            .map_err(|e| anyhow::anyhow!("event '{}': {e}", sample.title))?;

        EventStore::insert(
            &store,
            NewEvent {
                title: sample.title,
                description: sample.description,
                date,
                location: sample.location,
                category: NewEvent::category_or_default(sample.category),
                image: None,
                creator: owner.id,
            },
        )
        .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "seed complete");
    Ok(())
}
