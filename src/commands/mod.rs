pub mod add;
pub mod complete;
pub mod gate;
pub mod list;
pub mod plan;
pub mod show;
pub mod start;
pub mod status;
pub mod sweep;
