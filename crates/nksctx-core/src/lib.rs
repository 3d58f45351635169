pub mod client;
pub mod context;
pub mod error;
pub mod materializer;
pub mod signer;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{CloudClient, Cluster, ClusterListing};
pub use context::ContextStore;
pub use error::{EndpointFailure, NksError};
pub use materializer::{Authenticator, Materializer, UpdateRequest};
pub use sync::{list_entries, switch_to_cluster, ListEntry, SyncReport, Syncer};
pub use transport::{HttpResponse, HttpTransport, Transport};
