pub mod estimate;
pub mod ride;
pub mod ticket;
