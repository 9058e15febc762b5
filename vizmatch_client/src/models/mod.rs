pub mod client;
pub mod input;
pub mod repl;
pub mod session;
