pub mod features;
pub mod readings;
pub mod synthesis;
