// Session lifecycle: durable token slot, session state and its single writer

pub mod slot;
pub mod store;
pub mod types;

pub use slot::{FileTokenSlot, MemoryTokenSlot, SlotError, TOKEN_KEY, TokenSlot};
pub use store::{SessionStore, SessionWatcher};
pub use types::{SessionError, SessionEvent, SessionState};
