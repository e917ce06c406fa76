mod loader;
mod state;


pub use loader::ProgressLoader;
pub use state::ProgressState;
