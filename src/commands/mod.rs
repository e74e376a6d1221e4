pub mod check;
pub mod resolve;
pub mod show;

pub use check::CheckCommand;
pub use show::{ShowCommand, ShowFormat};
