pub mod declaration;
pub mod outcome;
pub mod remote_index;
pub mod unit;

pub use declaration::*;
pub use outcome::*;
pub use remote_index::*;
pub use unit::*;
