// Utility modules

pub mod detect;
pub mod encode;
pub mod output_path;
