//! Headless tail runner - event loop without TUI

use chrono::Utc;
use tracing::{info, warn};

use shakedeck_app::config::Settings;
use shakedeck_app::log_stream::write_export;
use shakedeck_app::message::Message;
use shakedeck_app::Engine;
use shakedeck_core::prelude::*;

use super::{plain_lines, TailCursor, TailEvent};

/// Follow `task_id`'s live log until Ctrl+C.
///
/// Reconnects follow the configured delay, exactly like the console's live
/// log modal.
pub async fn run_tail(
    settings: Settings,
    task_id: &str,
    export_on_exit: bool,
    json: bool,
) -> Result<()> {
    info!("Tailing task {} in headless mode", task_id);

    let export_dir = settings.export.directory.clone();
    let mut engine = Engine::connect(settings)?;
    engine.process_message(Message::OpenLiveLog {
        task_id: task_id.to_string(),
    });

    let mut cursor = TailCursor::new();
    emit_changes(&engine, &mut cursor, json);

    let mut collected = None;
    while !engine.should_quit() {
        let Some(msg) = engine.msg_rx.recv().await else {
            info!("Message channel closed");
            break;
        };
        if export_on_exit && matches!(msg, Message::Quit) {
            collected = engine.quit_with_export(Utc::now());
        } else {
            engine.process_message(msg);
        }
        emit_changes(&engine, &mut cursor, json);
    }

    if export_on_exit {
        // the channel can close without a Quit; the session is still open then
        let collected = collected.or_else(|| engine.state.live_log.export(Utc::now()));
        match collected {
            Some(export) => {
                let path = write_export(&export_dir, &export)?;
                emit(
                    &TailEvent::exported(task_id, &path.display().to_string(), export.line_count),
                    json,
                );
            }
            None => warn!("Nothing to export for task {}", task_id),
        }
    }

    engine.shutdown();
    Ok(())
}

fn emit_changes(engine: &Engine, cursor: &mut TailCursor, json: bool) {
    if let Some(session) = engine.state.live_log.session() {
        for event in cursor.advance(session) {
            emit(&event, json);
        }
    }
}

fn emit(event: &TailEvent, json: bool) {
    if json {
        event.emit();
        return;
    }
    let (out, err) = plain_lines(event);
    if let Some(line) = out {
        println!("{}", line);
    }
    if let Some(line) = err {
        eprintln!("{}", line);
    }
}
