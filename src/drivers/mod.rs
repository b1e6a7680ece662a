mod curve;
mod physics_driver;
mod velocity;

pub use curve::*;
pub use physics_driver::*;
pub use velocity::*;

#[cfg(test)]
mod curve_tests;
#[cfg(test)]
mod physics_driver_tests;
