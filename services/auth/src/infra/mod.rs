pub mod code;
pub mod db;
pub mod mailer;
pub mod rate_limit;
