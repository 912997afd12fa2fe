//! Persistence for bot replies and user profiles
//!
//! Provides:
//! - `MessageStore` for writing bot replies into a chat
//! - `ProfileStore` for reading a user's preferred language
//! - Supabase (PostgREST) and in-memory implementations

pub mod error;
pub mod memory;
pub mod messages;
pub mod supabase;

pub use error::PersistenceError;
pub use memory::InMemoryStore;
pub use messages::{MessageStore, NewMessage, ProfileStore};
pub use supabase::SupabaseStore;

use std::sync::Arc;

use agrisaarthi_config::PersistenceConfig;

/// Message and profile stores sharing one backend
#[derive(Clone)]
pub struct PersistenceLayer {
    pub messages: Arc<dyn MessageStore>,
    pub profiles: Arc<dyn ProfileStore>,
}

/// Build the configured persistence layer
pub fn init(config: &PersistenceConfig) -> Result<PersistenceLayer, PersistenceError> {
    if config.enabled {
        let store = Arc::new(SupabaseStore::new(config)?);
        tracing::info!(url = %config.supabase_url, "Using Supabase persistence");
        Ok(PersistenceLayer {
            messages: store.clone(),
            profiles: store,
        })
    } else {
        tracing::warn!(
            capacity = config.memory_capacity,
            "Persistence disabled, recent bot replies are kept in memory only"
        );
        let store = Arc::new(InMemoryStore::with_capacity(config.memory_capacity));
        Ok(PersistenceLayer {
            messages: store.clone(),
            profiles: store,
        })
    }
}
