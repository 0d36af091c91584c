//! Message processing
//!
//! Runs the TEA update function over a message and its follow-ups, handing
//! every resulting action to the action layer.

use tokio::sync::mpsc;

use crate::actions::{handle_action, SharedGateway, TaskRegistry};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<G: SharedGateway>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    gateway: &G,
    registry: &mut TaskRegistry,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), gateway, registry);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
