use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use state_dispatch::connection::{self, ConnectionEvent, ConnectionInfo, ConnectionMachine};
use state_dispatch::context::Context;
use state_dispatch::context_id::ContextId;
use state_dispatch::context_map::ContextMap;
use state_dispatch::driver::{self, DriverConfig, IterSource};
use tracing::info;
use uuid::Uuid;

const RANDOM_BURST: usize = 6;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let client_name =
        std::env::var("CLIENT_ID").unwrap_or_else(|_| Uuid::new_v4().to_string());

    let registry = Arc::new(connection::registry());
    let map: ContextMap<Mutex<Context<ConnectionMachine>>> = ContextMap::new();

    let server_id = ContextId::from("server");
    let client_id = ContextId::from(client_name);

    map.insert(
        server_id.clone(),
        Mutex::new(Context::new(
            server_id.clone(),
            Arc::clone(&registry),
            ConnectionInfo::with_role(true),
        )),
    )
    .context("insert server context")?;

    map.insert(
        client_id.clone(),
        Mutex::new(Context::new(
            client_id.clone(),
            Arc::clone(&registry),
            ConnectionInfo::with_role(false),
        )),
    )
    .context("insert client context")?;

    info!(contexts = map.len(), "connection demo starting");

    // Server side: open passively, accept, exchange data, close.
    let server_script = vec![
        ConnectionEvent::PassiveOpen,
        ConnectionEvent::Send,
        ConnectionEvent::Transmit("hello from server".to_string()),
        ConnectionEvent::Close,
    ];
    drive(&map, &server_id, server_script)?;

    // Client side: open actively, exchange data, close.
    let client_script = vec![
        ConnectionEvent::ActiveOpen,
        ConnectionEvent::Transmit("ping".to_string()),
        ConnectionEvent::Transmit("pong".to_string()),
        ConnectionEvent::Close,
    ];
    drive(&map, &client_id, client_script)?;

    // Random traffic against the client shows the fail-soft default: events
    // the current state doesn't handle are reported and ignored, and the
    // context stays usable.
    let mut rng = StdRng::from_os_rng();
    let burst: Vec<ConnectionEvent> = (0..RANDOM_BURST).map(|_| random_event(&mut rng)).collect();
    drive(&map, &client_id, burst)?;

    let (state, info) = map
        .get(&client_id)?
        .view(|cell| {
            let conn = cell.lock().expect("context lock poisoned");
            (conn.current(), conn.snapshot().clone())
        })?;
    println!(
        "client finished in {state:?} after {} transmitted segment(s)",
        info.segments_sent
    );

    Ok(())
}

fn drive(
    map: &ContextMap<Mutex<Context<ConnectionMachine>>>,
    id: &ContextId,
    script: Vec<ConnectionEvent>,
) -> Result<()> {
    let report = map.get(id)?.view(|cell| {
        let mut conn = cell.lock().expect("context lock poisoned");
        let mut source = IterSource(script.into_iter());
        driver::run(&mut conn, &mut source, &DriverConfig::default())
    })?;

    info!(context = %id, steps = report.steps, unhandled = report.unhandled, "script complete");
    Ok(())
}

fn random_event(rng: &mut StdRng) -> ConnectionEvent {
    match rng.random_range(0..6) {
        0 => ConnectionEvent::ActiveOpen,
        1 => ConnectionEvent::PassiveOpen,
        2 => ConnectionEvent::Close,
        3 => ConnectionEvent::Synchronize,
        4 => ConnectionEvent::Acknowledge,
        _ => ConnectionEvent::Send,
    }
}
