// Request/Response models
pub mod common;
pub mod contact;
pub mod fee;
pub mod member;
pub mod non_member;
pub mod role;
pub mod trip;
pub mod trip_type;
pub mod user;
