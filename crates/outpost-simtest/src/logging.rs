use env_logger::{Builder, Env};

/// Crates whose debug lines the harness cares about.
const SIM_CRATES: [&str; 2] = ["outpost_core", "outpost_logic"];

/// Filter used when `RUST_LOG` is unset.
///
/// Quiet runs show the simulation's info lines. `--verbose` opens debug for
/// the simulation crates only, so path and order traces are not buried under
/// noise from anything else linked into the binary.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = String::from("warn");
    for krate in SIM_CRATES {
        filter.push_str(&format!(",{krate}={level}"));
    }
    filter
}

/// Initializes the global logger for a harness run.
///
/// Lines carry no timestamp: the harness is deterministic and reports by
/// scenario, not by wall clock. `RUST_LOG` replaces the default filter.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let _ = Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .try_init();
}
