pub mod clock;
pub mod datetime;
pub mod diary;
pub mod registry;
