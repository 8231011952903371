pub mod guide;
pub mod hotel;
pub mod trip;
