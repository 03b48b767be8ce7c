//! Client side of the inventory API: paginated collection views that
//! re-synchronise after every mutation, gated by a login session.

pub mod api;
pub mod credentials;
pub mod error;
pub mod flash;
pub mod gateway;
pub mod resource;
pub mod session;
pub mod store;
pub mod view;

pub use api::ApiClient;
pub use credentials::CredentialStore;
pub use error::{AuthError, ClientError, ErrorKind};
pub use flash::{FlashBoard, FlashMessages};
pub use gateway::{Confirm, MutationGateway, MutationResult, MutationStatus};
pub use resource::{Resource, ResourceConfig};
pub use session::{RegistrationForm, SessionGate, SessionState};
pub use store::AppStore;
pub use view::{CollectionHandle, RemoteCollectionView, ViewState};
