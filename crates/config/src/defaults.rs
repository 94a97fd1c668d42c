//! Default values for fields that may be omitted from a `SimConfig` file.

/// Default matching-cycle delay, in milliseconds.
pub fn default_cycle_delay_ms() -> u64 {
    1_000
}
