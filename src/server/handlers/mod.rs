pub mod drivers;
pub mod rides;
