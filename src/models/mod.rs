mod body;
mod hand;
mod handles;
mod pose;
mod quaternion;
mod shape;

pub use body::*;
pub use hand::*;
pub use handles::*;
pub use pose::*;
pub use quaternion::*;
pub use shape::*;

#[cfg(test)]
mod quaternion_tests;
#[cfg(test)]
mod hand_tests;
