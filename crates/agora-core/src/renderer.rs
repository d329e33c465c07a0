//! The rendering surface the conversation client draws on.

use crate::core_types::Message;

/// Receives every change to the visible conversation, in log order.
///
/// Calls are made while the client holds its state lock, so implementations
/// must not call back into the client.
pub trait MessageRenderer: Send + Sync {
    /// A message was appended to the log.
    fn append(&self, message: &Message);

    /// The whole log was discarded.
    fn clear(&self);

    /// The typing indicator turned on or off.
    fn set_typing(&self, typing: bool);

    /// Out-of-band notice for the user; never part of the log.
    fn notify(&self, text: &str);
}

/// Renderer for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl MessageRenderer for NullRenderer {
    fn append(&self, _message: &Message) {}

    fn clear(&self) {}

    fn set_typing(&self, _typing: bool) {}

    fn notify(&self, _text: &str) {}
}
