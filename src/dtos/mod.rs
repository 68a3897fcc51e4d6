pub mod pager;
pub mod producto;
