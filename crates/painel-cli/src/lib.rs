//! Library side of the `painel` binary: logging setup and the dashboard
//! session driven by the command line.

pub mod logging;
pub mod session;
