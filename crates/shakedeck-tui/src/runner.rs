//! Main TUI runner - entry point and event loop

use shakedeck_app::config::Settings;
use shakedeck_app::Engine;
use shakedeck_core::prelude::*;

use super::{event, render, terminal};

/// Run the TUI against the server named in `settings`
pub async fn run(settings: Settings) -> Result<()> {
    // Install panic hook for terminal restoration
    terminal::install_panic_hook();

    let mut engine = Engine::connect(settings)?;

    let mut term = terminal::ConsoleTerminal::enter();
    engine.start();

    let result = run_loop(&mut term, &mut engine);

    // Close the live log stream and stop pollers before handing the
    // terminal back
    engine.shutdown();
    drop(term);

    if let Err(ref e) = result {
        error!("TUI loop failed: {}", e);
    }
    result
}

/// Main event loop
fn run_loop(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        // Process background results (pollers, stream worker, signals)
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &mut engine.state))?;

        // Handle terminal events
        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    info!("Leaving TUI");
    Ok(())
}
