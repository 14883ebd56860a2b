mod grant;
mod object;

pub use grant::MemoryGrantStore;
pub use object::{DEFAULT_PAGE_SIZE, MemoryObjectStore};
