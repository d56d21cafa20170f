// ABOUTME: Library module for d1-migrator
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod d1;
pub mod migration;
pub mod sqlite;
pub mod utils;
