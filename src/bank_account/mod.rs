pub mod builder;
pub mod details;
pub mod form;
mod pipeline;
pub mod presentation;
pub mod record;
pub mod state;
pub mod store;

pub use pipeline::normalize_account_number;
