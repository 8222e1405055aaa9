//! Schema definitions for rule files

pub mod body;
pub mod entity;
pub mod skill;
pub mod table;
