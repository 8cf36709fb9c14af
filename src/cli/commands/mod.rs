//! Command handlers

pub mod report_command;
