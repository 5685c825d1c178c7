pub mod record;
pub mod settings;
pub mod table;

pub use record::*;
pub use settings::*;
pub use table::*;
