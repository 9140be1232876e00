pub mod autopilot;
pub mod controller;
pub mod input;
pub mod laws;
pub mod mode;

pub use autopilot::Autopilot;
pub use controller::{ControlContext, ManualPilot, Pilot};
pub use input::{HeldControls, InputEvent, InputFrame, InputQueue, Key};
pub use laws::{Airframe, LawOutput};
pub use mode::{transition, AutopilotMode, ModeTrigger, ParseModeError};
