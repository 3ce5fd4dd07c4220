pub mod predict;
pub mod project;
pub mod train;
pub mod util;
