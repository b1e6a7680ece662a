mod contact_bone;
mod contact_hand;

pub use contact_bone::*;
pub use contact_hand::*;
