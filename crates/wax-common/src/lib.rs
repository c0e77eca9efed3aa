pub mod errors;
pub mod id;
pub mod main_loop;

pub use errors::{ConfigError, WaxError};
pub use id::{new_correlation_id, OperationId};
pub use main_loop::{MainLoop, MainLoopHandle};

pub type Result<T> = std::result::Result<T, WaxError>;
