//! Logging hookup for hosts embedding this crate.
//!
//! Call sites throughout `color`, `frame`, and `pipeline` use the `log`
//! facade macros directly (`log::{trace,debug,info,warn,error}`); this
//! module only provides a convenience initializer for binaries that want a
//! stderr subscriber without pulling in their own `env_logger` setup.

pub use log::Level;

/// Initializes a global `env_logger` subscriber at the given maximum level.
///
/// Safe to call more than once; subsequent calls are no-ops. Intended for
/// use by a host `main()`, not by library code, which should never install
/// a global logger on another crate's behalf.
pub fn init_subscriber(max_level: Level) {
    let _ = env_logger::Builder::new()
        .filter_level(max_level.to_level_filter())
        .is_test(false)
        .try_init();
}
