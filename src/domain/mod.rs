pub mod observation;
pub mod prediction;
pub mod request;
pub mod site;

pub use observation::*;
pub use prediction::*;
pub use request::*;
pub use site::*;
