//! Background request dispatch.

pub mod async_dispatcher;
pub mod loading_state;

// Re-export commonly used types
pub use async_dispatcher::{
    AsyncDispatcher, BackendRequest, BackendResponse, Completion, DispatchEvent, Ticket, Waker,
};
pub use loading_state::LoadingState;
