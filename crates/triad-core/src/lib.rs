pub mod config;
pub mod error;
pub mod feature;
pub mod io;
pub mod lock;
pub mod migrations;
pub mod paths;
pub mod project;
pub mod rules;
pub mod session;
pub mod types;

pub use error::{Result, TriadError};
pub use project::{Context, Outcome, Project, Status};
pub use types::Phase;
