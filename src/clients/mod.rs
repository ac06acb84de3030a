// Clients for the upstream case-management and analyzer platforms

pub mod cortex;
pub mod http;
pub mod thehive;
pub mod traits;

pub use cortex::*;
pub use http::*;
pub use thehive::*;
pub use traits::*;
