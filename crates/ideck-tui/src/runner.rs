//! TUI runner: terminal lifecycle and the main event loop

use std::time::Duration;

use ideck_app::Engine;
use ideck_client::InsightsSource;
use ideck_core::prelude::*;
use ratatui::DefaultTerminal;

use crate::{event, render, terminal};

/// Run the TUI until the user quits or a termination signal arrives.
///
/// Needs the multi-threaded runtime: key polling blocks the calling thread
/// while fetch tasks keep running on the others.
pub async fn run<S>(engine: &mut Engine<S>) -> Result<()>
where
    S: InsightsSource + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;

    engine.spawn_signal_handler();
    engine.start();

    let result = run_loop(&mut term, engine);

    engine.shutdown();
    ratatui::restore();

    if let Err(ref e) = result {
        error!("TUI loop failed: {}", e);
    }
    info!("Insights Deck exiting");
    result
}

fn run_loop<S>(term: &mut DefaultTerminal, engine: &mut Engine<S>) -> Result<()>
where
    S: InsightsSource + Sync + 'static,
{
    let tick_rate = Duration::from_millis(engine.state.settings.ui.tick_rate_ms);

    while !engine.should_quit() {
        engine.drain_pending_messages();
        if engine.should_quit() {
            break;
        }

        term.draw(|frame| render::view(frame, &engine.state))
            .map_err(|e| Error::terminal(e.to_string()))?;

        if let Some(message) = event::poll(tick_rate)? {
            engine.process_message(message);
        }
    }

    Ok(())
}
