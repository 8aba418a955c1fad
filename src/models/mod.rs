pub mod booking;
pub mod envelope;

pub use booking::{Booking, CreateBookingRequest};
pub use envelope::Envelope;
