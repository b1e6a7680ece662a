/// What happens to an object while every hand grasping it has lost tracking.
///
/// Both policies freeze the body (kinematic, zero velocity) until the grasp
/// resumes or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuspensionPolicy {
    /// The object's visibility flag is cleared while suspended.
    HideObject,
    /// The object stays visible where it was left.
    KeepVisible,
}

impl SuspensionPolicy {
    pub fn hides_object(self) -> bool {
        matches!(self, SuspensionPolicy::HideObject)
    }
}

impl Default for SuspensionPolicy {
    fn default() -> Self {
        SuspensionPolicy::HideObject
    }
}
