mod error;
mod generator;
mod id;
mod time;
mod worker_id;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
pub use crate::worker_id::*;
