pub mod profile;
pub mod scheduler;
pub mod time;

pub use profile::{FrameReport, MsPerFrame, PercentOfRun, PhaseStats};
pub use scheduler::{AnimationScheduler, ControlRequest, FrameRequester, ManualFrames, SchedulerControl};
pub use time::{Clock, ManualClock, SystemClock, Timer};
