pub mod form;
pub mod history;
pub mod result;
