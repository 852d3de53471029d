//! LESS driver.
//!
//! Ties the evaluation engine to CSS output:
//! - [`render`] expands a parsed stylesheet and prints it as CSS
//! - [`FilesystemLoader`] loads imported sources from disk
//! - [`init_tracing`] installs a log subscriber driven by `RUST_LOG`
//!
//! Parsing is not part of this crate; configure a
//! [`StylesheetParser`](less_eval::StylesheetParser) on the context for
//! stylesheets that contain imports.

mod loader;
mod render;

use std::sync::Once;

use less_eval::{Context, LessResult};
use less_ir::Stylesheet;

pub use less_eval::expand;
pub use loader::FilesystemLoader;
pub use render::CssRenderer;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing.
///
/// Call this early in your program (e.g., in main) to enable tracing output.
/// Controlled by the `RUST_LOG` environment variable:
/// - `RUST_LOG=less_eval=debug` - import and mixin resolution
/// - `RUST_LOG=less_eval=trace` - bindings, guards and closures
///
/// Does nothing if `RUST_LOG` is not set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .with(filter)
                .try_init();
        }
    });
}

/// Expand `sheet` and render the result as CSS using the context's options.
#[tracing::instrument(level = "debug", skip_all)]
pub fn render(sheet: &Stylesheet, ctx: &mut Context) -> LessResult<String> {
    let expanded = expand(sheet, ctx)?;
    let renderer = CssRenderer::new(ctx.interner(), ctx.options());
    Ok(renderer.render(&expanded))
}
