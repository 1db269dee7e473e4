mod decay_scheduler;

pub use decay_scheduler::{DecayScheduler, DEFAULT_DECAY_PERIOD};
