pub mod contact;
pub mod post;
pub mod query;
pub mod response;
pub mod users;
