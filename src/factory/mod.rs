// Crypto Provider — Factory Module
//
// Per-type provider factories and the registry that routes build requests
// to them.

mod base;
mod error;
mod registry;

pub use base::MetadataFileStore;
pub use error::FactoryError;
pub use registry::{FactoryRegistry, ProviderFactory, RegistrationPolicy};
