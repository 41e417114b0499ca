pub mod chroma_client;
pub mod memory_store;
pub mod pinecone_client;
pub mod redis_store;
pub mod session_store;
pub mod vector_index;

pub use chroma_client::ChromaClient;
pub use memory_store::InMemorySessionStore;
pub use pinecone_client::PineconeClient;
pub use redis_store::RedisSessionStore;
pub use session_store::{SessionStore, StoreError};
pub use vector_index::{IndexError, VectorIndex};
