pub mod internal;

pub use internal::{RetrievedPassage, Role, SessionId, Turn};
