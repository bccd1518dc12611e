//! Authentication for Hub API requests.
//!
//! The Hub authenticates by a token carried in the JSON request payload
//! rather than a header. A client may be configured with several tokens of
//! different scope; [`Credentials::select`] picks the single one to send.
//!
//! # Priority
//!
//! 1. `project_api_token`
//! 2. `cluster_api_token`
//! 3. `token` (user session)
//! 4. `system_token`
//!
//! Whether an empty credential set is acceptable is decided by
//! [`AuthPolicy`] when the configuration is built.

mod credentials;

pub use credentials::{AuthPolicy, Credentials};
