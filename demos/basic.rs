//! Basic example of using prisma-tracing with an in-memory engine.
//!
//! Run with: cargo run --example basic

use std::time::Duration;

use futures::FutureExt;
use prisma_tracing::prelude::*;
use prisma_tracing::RequestFuture;
use serde_json::{json, Value};
use tracing::Instrument;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stand-in for a query engine: answers `findMany` on `User`, fails otherwise.
struct MemoryEngine;

impl Dispatch for MemoryEngine {
    fn request(&self, params: Value) -> RequestFuture {
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            match (params["action"].as_str(), params["model"].as_str()) {
                (Some("findMany"), Some("User")) => Ok(json!([
                    { "id": 1, "email": "ada@example.com" },
                    { "id": 2, "email": "alan@example.com" },
                ])),
                (action, model) => Err(RequestError::new(format!(
                    "unsupported operation {} on {}",
                    action.unwrap_or("?"),
                    model.unwrap_or("?")
                ))),
            }
        }
        .boxed()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,prisma_tracing=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_span_events(FmtSpan::CLOSE))
        .init();

    // Every client handle shares this slot
    let slot = DispatchSlot::new(MemoryEngine);

    // Option 1: defaults
    let instrumentation = PrismaInstrumentation::default();

    // Option 2: keep arguments out of traces
    // let instrumentation = PrismaInstrumentation::new(InstrumentationConfig::production());

    instrumentation.install(&slot);

    let handler = async {
        let users = slot
            .request(json!({
                "clientMethod": "findMany",
                "action": "findMany",
                "model": "User",
                "args": { "where": { "email": { "endsWith": "@example.com" } }, "take": 10 },
            }))
            .await?;
        tracing::info!(count = users.as_array().map_or(0, Vec::len), "Loaded users");

        if let Err(e) = slot
            .request(json!({ "clientMethod": "deleteMany", "action": "deleteMany", "model": "Post" }))
            .await
        {
            tracing::info!(error = %e, "Engine rejected request");
        }
        Ok::<_, RequestError>(())
    };
    handler.instrument(tracing::info_span!("GET /users")).await?;

    // Calls made after uninstalling produce no spans
    instrumentation.uninstall(&slot);
    let _ = slot.request(json!({ "clientMethod": "count", "action": "count", "model": "User" })).await;

    Ok(())
}
