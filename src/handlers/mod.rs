pub mod trip_form;
pub mod trips;
