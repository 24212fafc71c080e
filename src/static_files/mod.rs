//! Content-root access: resolving request targets to files and turning them
//! into responses.

pub mod resolver;
pub mod responder;

pub use resolver::{FileResource, PathResolver, ResolveError};
pub use responder::Responder;
