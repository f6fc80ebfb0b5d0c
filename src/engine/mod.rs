#[cfg(feature = "sdl")]
pub mod input;
pub mod scheduler;
pub mod time;
#[cfg(feature = "sdl")]
pub mod window;
