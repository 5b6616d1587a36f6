pub mod defaults;
pub mod errors;
pub mod id;

pub use defaults::{DEFAULT_API_URL, DEFAULT_MODEL};
pub use errors::{ConfigError, ParleyError};
pub use id::{new_id, IdGenerator, SequentialIds, UuidGenerator};

pub type Result<T> = std::result::Result<T, ParleyError>;
