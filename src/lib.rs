/*
 * Deskhand - Sandboxed File-System Assistant
 * File Path: src/lib.rs
 * Responsibility: Shared library modules
 */

pub mod agent;
pub mod config;
pub mod decision;
pub mod error;
pub mod llm;
pub mod runner;
pub mod sandbox;
pub mod tools;
