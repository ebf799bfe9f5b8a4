pub mod filter;
pub mod record;
pub mod table;
pub mod view;

pub use filter::*;
pub use record::*;
pub use table::*;
pub use view::*;
