//! rutgen - Chilean RUT toolkit
//!
//! Provides:
//! - Modulo-11 check digit computation for RUT bodies
//! - Positional formatting with configurable body and check digit separators
//! - Random valid RUT generation
//! - Optional cleaning and validation of user-supplied RUTs
//! - MCP server exposing the above as tools

pub mod checksum;
pub mod config;
pub mod mcp;
pub mod rut;
pub mod types;

pub use checksum::compute_check_digit;
pub use config::{ConfigError, RutgenConfig};
pub use rut::{
    RutError, clean_rut, format_rut, format_rut_value, random_rut, random_rut_with, random_ruts,
    strip_separators, validate_rut,
};
pub use types::*;
