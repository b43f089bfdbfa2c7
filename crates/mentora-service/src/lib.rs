//! Session use cases: recurring materialization, single-slot creation, booking.

pub mod booking;
pub mod error;
pub mod recurring;
pub mod session;

pub use booking::BookingService;
pub use recurring::RecurringSessionService;
pub use session::{SessionService, SingleSessionRequest};
