//! Credential validation, bearer-token issuance, and the security audit hooks around them.

pub mod credentials;
pub mod guard;
pub mod issuer;
pub mod observer;
pub mod secret;

pub use credentials::*;
pub use guard::*;
pub use issuer::*;
pub use observer::*;
pub use secret::*;
