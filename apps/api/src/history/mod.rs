// Analysis history: storage, pagination and the read/delete endpoints.

pub mod handlers;
pub mod pagination;
pub mod store;
