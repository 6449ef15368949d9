//! Conversation assembly: history + preamble in, normalized reply out.

pub mod assembler;
pub mod locks;
pub mod prompt;

pub use assembler::{ChatAssembler, ChatOutcome, PROVIDER_ERROR_REPLY, ReplyStatus};
pub use locks::UserLocks;
pub use prompt::{ARTLINK_PREAMBLE, build_contents};
