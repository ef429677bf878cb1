pub mod location;
pub mod timestamps;
