//! Lead-intake handshake: bound tokens, submission forwarding, status polling.

pub mod poll;
pub mod routes;
pub mod token;

pub use poll::{PollConfig, poll_status};
pub use routes::{IntakeState, intake_routes};
pub use token::{IntakeClaims, TOKEN_TTL, TOKEN_TYPE, TokenService};
