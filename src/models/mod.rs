pub mod prompt;
pub mod session;
pub mod variation;
pub mod wire;

pub use prompt::*;
pub use session::*;
pub use variation::*;
pub use wire::*;
