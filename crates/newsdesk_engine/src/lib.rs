//! Newsdesk engine: HTTP collaborators, credential storage and the async
//! runtimes that execute core effects.
mod auth_client;
mod bus;
mod controller;
mod credential;
mod gate;
mod http;
mod inbox;
mod persist;
mod search_client;
mod types;
mod wire;

pub use auth_client::{AuthClient, ReqwestAuthClient};
pub use bus::{EventBus, Subscription};
pub use controller::{HoverSignal, Navigator, SearchController};
pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use gate::AuthGate;
pub use http::{ClientSettings, SetupError};
pub use persist::{ensure_parent_dir, remove_if_present, write_atomically, PersistError};
pub use search_client::{ReqwestSearchClient, SearchClient, MIN_QUERY_CHARS};
pub use types::{AuthError, SearchError};
