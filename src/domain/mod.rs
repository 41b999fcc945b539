pub mod commodity;
pub mod profiles;
pub mod properties;

pub use commodity::*;
pub use profiles::*;
pub use properties::*;
