pub mod channel;
pub mod header;
pub mod main;
pub mod scanner;
pub mod stream;

pub use channel::*;
pub use header::*;
pub use main::*;
pub use scanner::*;
pub use stream::*;
