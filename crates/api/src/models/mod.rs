mod participant;
pub mod timestamp;

pub use participant::Participant;
