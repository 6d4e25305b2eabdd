//! Zpp generator: semantic analysis fused with IR generation.
//!
//! One pass over the AST both type-checks and emits [`zpp_lir`] code.
//! Work is demand-driven: generating `main` (or the test runner) generates
//! every function it calls, instantiating generics per argument list,
//! evaluating globals and named types on first reference.
//!
//! # Architecture
//!
//! - **Context** (`context.rs`): [`Generator`], the single compilation
//!   context holding the type pool, output module, module graph and caches
//! - **Modules** (`module.rs`): loading through [`ModuleLoader`], item
//!   mapping and import checks
//! - **Scopes** (`scope.rs`): persistent frames, declaration and lookup
//! - **Types** (`types.rs`): type expressions to [`zpp_types::TypeId`]
//! - **Expressions** (`expr/`) and **statements** (`stmt/`): one handler per
//!   node kind, plus the lowering of `and`/`or`, `try`, `match`, `out`
//! - **Functions** (`function.rs`): generation and monomorphization
//! - **Entry points** (`entry.rs`): `main` wrapper and the test runner
//!
//! Generation is fail-fast: the first [`GenError`] is returned and nothing
//! else is checked.
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `ZPP_LOG`, e.g. `ZPP_LOG=zpp_gen=debug`
//! or `ZPP_LOG=zpp_gen::function=trace`.

mod config;
mod context;
mod entry;
mod error;
mod expr;
mod function;
mod loader;
mod mono;
mod module;
mod scope;
mod stack;
mod stmt;
mod symbol;
mod types;
mod value;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Once;

pub use config::{BuildMode, GenConfig};
pub use context::{Compilation, Generator};
pub use error::{GenError, GenResult};
pub use loader::{absolute_path, normalize_path, LoadedModule, MemoryLoader, ModuleLoader};
pub use module::ModuleId;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the tracing filter.
pub const LOG_VAR: &str = "ZPP_LOG";

/// Install a stderr tracing subscriber filtered by `ZPP_LOG`.
///
/// Does nothing when the variable is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if let Ok(filter) = EnvFilter::try_from_env(LOG_VAR) {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .with(filter)
                .try_init();
        }
    });
}

/// Generate an executable module whose entry point is `main` in `entry`.
pub fn generate(
    loader: impl ModuleLoader + 'static,
    entry: &Path,
    config: GenConfig,
) -> GenResult<Compilation> {
    let mut gen = Generator::new(loader, config);
    let module = gen.load_entry(entry)?;
    gen.gen_main(module)?;
    Ok(gen.finish())
}

/// Generate a module whose `main` runs every test declared in `entry`.
pub fn generate_tests(
    loader: impl ModuleLoader + 'static,
    entry: &Path,
    config: GenConfig,
) -> GenResult<Compilation> {
    let mut gen = Generator::new(loader, config);
    let module = gen.load_entry(entry)?;
    gen.gen_tests(module)?;
    Ok(gen.finish())
}
