// Job application intake: validation, notification templates, dispatch.
// All provider calls go through gateways; nothing here talks HTTP to a provider.

pub mod handlers;
pub mod service;
pub mod templates;
pub mod validation;
