pub mod db;
pub mod directions;
