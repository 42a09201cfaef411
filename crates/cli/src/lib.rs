//! `tb-cli`: command-line front end for the telemetry bridge.

pub mod cli;
