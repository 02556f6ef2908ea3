pub mod feature;
pub mod init;
pub mod mcp;
pub mod migrate;
pub mod phase;
pub mod status;
