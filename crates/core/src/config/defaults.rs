//! Default values and functions for settings

/// Default bound on nested anonymous fixtures
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// Default number of fractional digits of generated decimals
pub const DEFAULT_DECIMAL_SCALE: u8 = 3;
pub(crate) const DEFAULT_DECIMAL_MAX_RETRIES: usize = 16;
pub(crate) const DEFAULT_BYTE_ARRAY_LENGTH: usize = 8;

pub(crate) fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

pub(crate) fn default_decimal_scale() -> u8 {
    DEFAULT_DECIMAL_SCALE
}

pub(crate) fn default_decimal_max_retries() -> usize {
    DEFAULT_DECIMAL_MAX_RETRIES
}

pub(crate) fn default_byte_array_length() -> usize {
    DEFAULT_BYTE_ARRAY_LENGTH
}
