mod kabsch;

pub use kabsch::*;
