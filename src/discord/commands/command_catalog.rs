// Discord commands module.
// Each feature gets its own command file.

pub mod points;

// Bot presence management
pub mod presence;
