mod arena;
mod interaction_object;
mod interaction_scene;
mod tracked_hand;

pub use arena::*;
pub use interaction_object::ObjectSettings;
pub(crate) use interaction_object::InteractionObject;
pub use interaction_scene::*;
pub(crate) use tracked_hand::TrackedHand;
