//! Utility functions for currency and date formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    first_name, format_amount_input, format_brl, format_date, parse_amount_input, signed_amount,
};
