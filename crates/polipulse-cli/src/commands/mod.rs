pub mod check;
pub mod import;
pub mod list;
pub mod template;
