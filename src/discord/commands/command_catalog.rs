// Discord commands module.
// Each feature gets its own command file.

// Bot presence management
pub mod presence;

pub mod start;
