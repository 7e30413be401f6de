pub mod checkin;
pub mod participant;
