pub mod crop;
pub mod features;
pub mod input;
