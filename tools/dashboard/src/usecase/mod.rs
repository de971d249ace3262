pub mod actions;
pub mod poll;
