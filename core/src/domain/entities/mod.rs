//! Domain entities exchanged between callers, the dispatcher and providers.

pub mod send_request;
pub mod send_result;

#[cfg(test)]
mod tests;

pub use send_request::{SendRequest, TemplateParams};
pub use send_result::SendResult;
