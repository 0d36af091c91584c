//! Terminal ownership for the console
//!
//! The console only logs to its file, so a panic would otherwise leave no
//! trace once the alternate screen is gone. The hook records the panic in the
//! log before the terminal is handed back.

use std::any::Any;
use std::ops::{Deref, DerefMut};
use std::panic::Location;

use ratatui::DefaultTerminal;
use shakedeck_core::prelude::*;

/// Install a panic hook that logs the panic and restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("{}", describe_panic(panic_info.payload(), panic_info.location()));
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Raw-mode alternate screen, restored when dropped.
///
/// Dropping covers the early returns of the render loop as well as the
/// normal exit.
pub struct ConsoleTerminal {
    inner: DefaultTerminal,
}

impl ConsoleTerminal {
    pub fn enter() -> Self {
        debug!("Entering alternate screen");
        Self {
            inner: ratatui::init(),
        }
    }
}

impl Deref for ConsoleTerminal {
    type Target = DefaultTerminal;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ConsoleTerminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for ConsoleTerminal {
    fn drop(&mut self) {
        ratatui::restore();
        debug!("Terminal restored");
    }
}

/// One log line for a panic: message and, when known, where it happened
fn describe_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    match location {
        Some(at) => format!("Panic at {}:{}: {}", at.file(), at.line(), message),
        None => format!("Panic: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_static_str_panic() {
        let at = Location::caller();
        let text = describe_panic(&"index out of range", Some(at));
        assert!(text.starts_with(&format!("Panic at {}:", at.file())));
        assert!(text.ends_with(": index out of range"));
    }

    #[test]
    fn test_describe_formatted_panic_without_location() {
        let payload = String::from("task 7 vanished");
        assert_eq!(describe_panic(&payload, None), "Panic: task 7 vanished");
    }

    #[test]
    fn test_describe_opaque_payload() {
        assert_eq!(describe_panic(&42_u32, None), "Panic: non-string panic payload");
    }
}
