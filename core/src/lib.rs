pub mod result;
pub mod service;
pub mod store;
pub mod validator;

pub use result::*;
pub use service::*;
pub use store::*;
