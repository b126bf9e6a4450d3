pub mod credentials;
pub mod tasks;

pub use credentials::{CredentialError, CredentialService};
pub use tasks::TaskService;
