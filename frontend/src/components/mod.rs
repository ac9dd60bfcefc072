pub mod nav;
pub mod pagination;
pub mod toast;
