pub mod macros;
pub mod records;
pub mod role;
pub mod time;

pub use records::*;
pub use role::*;
pub use time::*;
