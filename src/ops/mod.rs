pub mod actions;
pub mod index;
pub mod placement;
pub mod row_sync;
