pub mod skill_runner;

pub use skill_runner::PlaceholderRunner;
