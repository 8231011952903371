pub mod geo;
pub mod slug;
