//! `log` records routed to the browser console through `console_log`.
//! Native builds install no logger, so records are dropped there.

use log::LevelFilter;

/// Install the console logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    if let Some(max) = level.to_level() {
        if console_log::init_with_level(max).is_err() {
            log::debug!("logger already installed");
        }
    }
    log::set_max_level(level);
}
