mod aggregator;
mod events;
mod grasping_hand_set;
mod state_machine;
mod suspension;
mod throwing;

pub use aggregator::*;
pub use events::*;
pub use grasping_hand_set::*;
pub use state_machine::*;
pub use suspension::*;
pub use throwing::*;

#[cfg(test)]
mod state_machine_tests;
#[cfg(test)]
mod throwing_tests;
