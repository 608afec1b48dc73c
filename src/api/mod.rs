//! Command API
//!
//! A closed set of typed requests and replies, so callers that only hold
//! data (the CLI, a future network front end) can drive an [`Engine`]
//! through one entry point: [`Engine::execute`].
//!
//! ```text
//! Command::HIncr { key, field, delta }  ──► Engine::execute ──► Reply::Int(n)
//! Command::ZRange { .., with_scores }   ──►                 ──► Reply::Scored(..)
//! ```
//!
//! [`Engine`]: crate::Engine
//! [`Engine::execute`]: crate::Engine::execute

mod command;
mod reply;

pub use command::Command;
pub use reply::Reply;
