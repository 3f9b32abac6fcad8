//! Intake API — backend for the marketing site's lead-intake, contact, and
//! waiting-list forms. Thin by design: request validation, bound-token
//! issuance/verification, and pass-through forwarding to the external
//! Intake Gateway that does the actual scanning work.

pub mod config;
pub mod contact;
pub mod email;
pub mod error;
pub mod gateway;
pub mod intake;
pub mod net;
pub mod waiting_list;
