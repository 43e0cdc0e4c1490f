mod browse;
mod root;

pub use root::Cli;
