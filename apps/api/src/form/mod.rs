// Form: attachments with preview handles, the busy-guarded session, and its handlers.

pub mod attachments;
pub mod handlers;
pub mod session;

pub use session::FormSession;
