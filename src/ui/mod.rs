pub mod layout;
pub mod palette;
