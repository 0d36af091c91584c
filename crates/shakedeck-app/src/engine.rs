//! Engine - shared orchestration state for the TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel, the gateway to the
//! server and the registry of background tasks (pollers, stream worker,
//! reconnect timer). Runners feed it messages and render its state.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};

use shakedeck_client::ApiClient;
use shakedeck_core::prelude::*;

use crate::actions::{handle_action, SharedGateway, TaskRegistry};
use crate::config::Settings;
use crate::log_stream::LogExport;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;
use crate::UpdateAction;

/// Capacity of the unified message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Orchestration engine for shakedeck.
///
/// Generic over the gateway so tests can drive it with a scripted server.
pub struct Engine<G: SharedGateway = ApiClient> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, key reader).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Loaded settings
    pub settings: Settings,

    gateway: G,
    registry: TaskRegistry,
}

impl Engine<ApiClient> {
    /// Create an engine talking to the server named in `settings`.
    ///
    /// Spawns the OS signal handler, so this must run inside a tokio runtime.
    pub fn connect(settings: Settings) -> Result<Self> {
        let gateway = ApiClient::new(
            &settings.server.base_url,
            settings.server.request_timeout(),
        )?;
        info!("Using task server {}", gateway.base_url());
        let engine = Self::with_gateway(settings, gateway);
        signals::spawn_signal_handler(engine.msg_sender());
        Ok(engine)
    }
}

impl<G: SharedGateway> Engine<G> {
    /// Create an engine around an existing gateway. No signal handler.
    pub fn with_gateway(settings: Settings, gateway: G) -> Self {
        let state = AppState::with_settings(settings.clone());
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            gateway,
            registry: TaskRegistry::new(),
        }
    }

    /// Load the initial view and start its pollers.
    pub fn start(&mut self) {
        let view = self.state.view;
        self.process_message(Message::SwitchView(view));
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.gateway,
            &mut self.registry,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. The TUI runner calls this
    /// before every render.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Process a `Quit`, returning the live log export taken while the
    /// session still holds its lines. `None` when no live log is open.
    pub fn quit_with_export(&mut self, now: DateTime<Utc>) -> Option<LogExport> {
        let export = self.state.live_log.export(now);
        self.process_message(Message::Quit);
        export
    }

    /// Execute an action directly, bypassing the update function.
    pub fn dispatch(&mut self, action: UpdateAction) {
        handle_action(action, self.msg_tx.clone(), &self.gateway, &mut self.registry);
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Close the live log session, stop pollers and signal background tasks.
    pub fn shutdown(&mut self) {
        if self.state.live_log.is_open() {
            let commands = self.state.live_log.unmount();
            if let Some(action) = UpdateAction::stream(commands) {
                self.dispatch(action);
            }
        }
        let _ = self.shutdown_tx.send(true);
        self.registry.shutdown();
        info!("Engine shut down");
    }
}
