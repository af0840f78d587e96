pub mod driver;
pub mod loop_worker;
pub mod math;
pub mod scene;
pub mod tracker;

pub use driver::GazeDriver;
pub use loop_worker::{Pose, PoseSource};
pub use math::Vec3;
pub use scene::{Capabilities, InteractableFilter, RayHit, Raycaster, SphereScene, TargetId};
pub use tracker::{CursorSample, FocusEvent, GazeState, GazeSwitch, PointerTracker};
