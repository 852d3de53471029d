//! Import expansion.
//!
//! Each `@import` is resolved, loaded through the context, recursively
//! expanded and spliced in place, bracketed by begin/end markers. Paths that
//! name plain CSS are left in place for the output.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use less_ir::{Block, Import, ImportMarker, Media, Node};

use super::Evaluator;
use crate::environment::{Environment, Frame};
use crate::errors::LessResult;

/// Paths that already carry an extension or a query/parameter suffix.
#[expect(clippy::expect_used, reason = "literal pattern")]
static IMPORT_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*(\.[a-z]*|[?;].*)$").expect("valid import extension pattern"));

/// Paths naming plain CSS, optionally followed by a query/parameter suffix.
#[expect(clippy::expect_used, reason = "literal pattern")]
static IMPORT_CSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*css([?;].*)?$").expect("valid css import pattern"));

impl Evaluator<'_> {
    /// Replace every resolvable import in the frame with its expanded rules.
    pub(super) fn expand_imports(&mut self, env: &Environment, frame: &Frame) -> LessResult<()> {
        let mut i = 0;
        loop {
            let import = match frame.borrow().get(i) {
                None => break,
                Some(Node::Import(import)) => Some(import.clone()),
                Some(_) => None,
            };
            let Some(import) = import else {
                i += 1;
                continue;
            };
            match self.execute_import(env, &import)? {
                Some(block) => i += frame.borrow_mut().splice(i, 1, block.into_rules()),
                None => i += 1,
            }
        }
        Ok(())
    }

    /// Resolve one import. `None` leaves it in place as a CSS import.
    fn execute_import(&mut self, env: &Environment, import: &Import) -> LessResult<Option<Block>> {
        let repr = self.printer().import(import);
        let mut path = self
            .render_path(env, import)
            .map_err(|err| err.context(repr.clone(), import.span))?;
        if !IMPORT_EXT.is_match(&path) {
            path.push_str(&self.ctx.options().import_extension);
        }
        if IMPORT_CSS.is_match(&path) {
            tracing::debug!(path = %path, "leaving css import in place");
            return Ok(None);
        }

        let resolved = self.ctx.resolve_path(&path, import.base_dir.as_deref());
        tracing::debug!(path = %resolved.display(), once = import.once, "expanding import");
        self.ctx
            .start_import(&resolved)
            .map_err(|err| err.context(repr.clone(), import.span))?;
        let loaded = self.load_import(env, &resolved, import.once);
        self.ctx.finish_import();
        let mut block = loaded.map_err(|err| err.context(repr, import.span))?;

        if let Some(features) = import.features.as_ref().filter(|f| !f.is_empty()) {
            let features = self.eval_features(env, features)?;
            block = Block::with_rules(vec![Node::Media(Media::new(features, block, import.span))]);
        }
        block.prepend(marker(import, true));
        block.push(marker(import, false));
        Ok(Some(block))
    }

    /// Load the stylesheet at `path` and expand its own imports.
    fn load_import(&mut self, env: &Environment, path: &Path, once: bool) -> LessResult<Block> {
        let sheet = self.ctx.load_stylesheet(path, once)?;
        let frame = Frame::new(sheet.block);
        self.expand_imports(env, &frame)?;
        let block = frame.borrow().clone();
        Ok(block)
    }

    fn render_path(&mut self, env: &Environment, import: &Import) -> LessResult<String> {
        let path = self.eval_expr(env, &import.path)?;
        Ok(self.text_of(&path))
    }
}

fn marker(import: &Import, begin: bool) -> Node {
    Node::ImportMarker(ImportMarker {
        import: Box::new(import.clone()),
        begin,
    })
}
