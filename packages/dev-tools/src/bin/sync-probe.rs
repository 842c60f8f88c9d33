//! Sync Probe Binary
//!
//! Connects a sync session to a running notes server, loads the signed-in
//! user and their notebooks, and prints what landed in the entity store.
//! Useful for checking server compatibility without starting the UI.
//!
//! # Usage
//!
//! ```bash
//! # Probe the default server (http://localhost:9081)
//! cargo run --bin sync-probe
//!
//! # Probe another server and also exercise undo on an existing note
//! NOTESYNC_BASE_URL=http://localhost:8080 cargo run --bin sync-probe -- --undo 42
//! ```
//!
//! # Environment Variables
//!
//! - `NOTESYNC_BASE_URL`, `NOTESYNC_TIMEOUT`, `NOTESYNC_AUTH_TOKEN`: see `ClientConfig`
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")
//!
//! # Undo Probe
//!
//! With `--undo <note-id>`, the probe rewrites the note's title, undoes the
//! edit and checks that the original title came back. The note is left as it
//! was found.

use std::env;

use notesync_core::{ClientConfig, Link, Note, SyncService, TextContent, UndoOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let undo_note = parse_undo_flag(env::args().skip(1))?;

    let config = ClientConfig::from_env();
    tracing::info!("Probing notes server at {}", config.base_url);

    let service = SyncService::connect(&config)?;
    let mut events = service.subscribe();

    let info = service.get_current_user_info().await?;
    match info.user {
        Some(ref user) => tracing::info!("Signed in as {} (id {})", user.name, user.id),
        None => tracing::warn!("No user signed in; notebook listing may be empty"),
    }

    let notebooks = service.get_notebooks().await?;
    tracing::info!("{} notebook(s)", notebooks.notebooks.len());

    for notebook in &notebooks.notebooks {
        let Some(ref head) = notebook.head_note_id else {
            continue;
        };
        let bundle = service.get_note_and_children(head).await?;
        tracing::info!(
            "notebook {}: head {} with {} note(s), {} link(s)",
            notebook.id,
            head,
            bundle.notes.len(),
            bundle.links.len()
        );
    }

    if let Some(note_id) = undo_note {
        probe_undo(&service, &note_id).await?;
    }

    let mut received = 0;
    while let Ok(event) = events.try_recv() {
        tracing::debug!("store event {}", event.event_type());
        received += 1;
    }

    println!(
        "notes={} links={} notebooks={} events={}",
        service.store().count::<Note>(),
        service.store().count::<Link>(),
        service.store().notebooks().len(),
        received
    );

    Ok(())
}

fn parse_undo_flag(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<String>> {
    let mut undo_note = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--undo" => {
                let note_id = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--undo requires a note id"))?;
                undo_note = Some(note_id);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }
    Ok(undo_note)
}

async fn probe_undo(service: &SyncService, note_id: &str) -> anyhow::Result<()> {
    let original = match service.store().get_note(note_id) {
        Some(note) => note,
        None => {
            service.get_note_and_children(note_id).await?;
            service
                .store()
                .get_note(note_id)
                .ok_or_else(|| anyhow::anyhow!("Server did not return note {}", note_id))?
        }
    };

    let probe_title = format!("{} (sync probe)", original.title);
    service
        .update_text_content(
            note_id,
            TextContent::new(probe_title, original.description.clone()),
        )
        .await?;
    tracing::info!("Edited note {}; undo entry: {:?}", note_id, service.peek_undo()?);

    match service.undo().await? {
        UndoOutcome::Edit(note) if note.title == original.title => {
            tracing::info!("Undo restored title {:?}", note.title);
            Ok(())
        }
        UndoOutcome::Edit(note) => anyhow::bail!(
            "Undo left title {:?}, expected {:?}",
            note.title,
            original.title
        ),
        UndoOutcome::Delete(_) => anyhow::bail!("Undo reversed a deletion the probe never made"),
    }
}
