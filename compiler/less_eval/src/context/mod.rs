//! Compilation context.
//!
//! A [`Context`] is scoped to one compilation. It owns the interner, the
//! options, the collaborators that turn import paths into trees (a
//! [`SourceLoader`] and a [`StylesheetParser`]), the once-import cache, the
//! chain of imports currently being resolved and parse statistics.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use less_ir::{Block, Import, Node, SharedInterner, Span, Stylesheet};

use crate::errors::{import_cycle, import_failed, syntax_error, LessResult};

/// Loads raw source text for a resolved import path.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> LessResult<String>;
}

/// Parses source text into a stylesheet tree.
///
/// Implementations report malformed input as a syntax error
/// ([`errors::syntax_error`](crate::errors::syntax_error)).
pub trait StylesheetParser {
    fn parse(&self, source: &str, path: &Path) -> LessResult<Stylesheet>;
}

/// Evaluation and rendering options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of simultaneously live invocations of one mixin.
    pub recursion_limit: usize,
    /// Extension appended to import paths that have none.
    pub import_extension: String,
    /// Render without optional whitespace.
    pub compress: bool,
    /// Indentation width of rendered output.
    pub indent: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            recursion_limit: 64,
            import_extension: ".less".to_owned(),
            compress: false,
            indent: 2,
        }
    }
}

impl Options {
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    #[must_use]
    pub fn with_import_extension(mut self, extension: impl Into<String>) -> Self {
        self.import_extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// In-memory sources keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        MemoryLoader::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), source.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> LessResult<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| import_failed(path, "file not found"))
    }
}

/// Serves trees built ahead of time, keyed by path.
///
/// For tooling that constructs trees with `less_ir::TreeBuilder` instead of
/// parsing text. The source handed to `parse` is ignored; a path with no
/// registered tree is a syntax error.
#[derive(Clone, Debug, Default)]
pub struct PrebuiltParser {
    trees: FxHashMap<PathBuf, Stylesheet>,
}

impl PrebuiltParser {
    pub fn new() -> Self {
        PrebuiltParser::default()
    }

    #[must_use]
    pub fn with_tree(mut self, path: impl AsRef<Path>, tree: Stylesheet) -> Self {
        self.trees.insert(normalize_path(path.as_ref()), tree);
        self
    }
}

impl StylesheetParser for PrebuiltParser {
    fn parse(&self, _source: &str, path: &Path) -> LessResult<Stylesheet> {
        self.trees.get(&normalize_path(path)).cloned().ok_or_else(|| {
            syntax_error(
                format!("no tree registered for {}", path.display()),
                Span::DUMMY,
            )
        })
    }
}

/// Per-compilation state.
pub struct Context {
    interner: SharedInterner,
    options: Options,
    loader: Box<dyn SourceLoader>,
    parser: Option<Box<dyn StylesheetParser>>,
    root_dir: Option<PathBuf>,
    once_cache: FxHashMap<PathBuf, Stylesheet>,
    loading_stack: Vec<PathBuf>,
    loading_set: FxHashSet<PathBuf>,
    parse_count: usize,
}

impl Context {
    /// Context with default options, an empty in-memory loader and no
    /// parser. Use [`ContextBuilder`] to configure one.
    pub fn new(interner: SharedInterner) -> Self {
        ContextBuilder::new().interner(interner).build()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Number of sources parsed by this context.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Imports currently being resolved, outermost first.
    pub fn import_chain(&self) -> &[PathBuf] {
        &self.loading_stack
    }

    /// Resolve an import path against the directory of the importing file,
    /// falling back to the root directory.
    pub fn resolve_path(&self, path: &str, base_dir: Option<&Path>) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            return normalize_path(path);
        }
        match base_dir.or(self.root_dir.as_deref()) {
            Some(dir) => normalize_path(&dir.join(path)),
            None => normalize_path(path),
        }
    }

    /// Enter an import. Fails if `path` is already being resolved further up
    /// the current chain.
    pub fn start_import(&mut self, path: &Path) -> LessResult<()> {
        if self.loading_set.contains(path) {
            let chain: Vec<&Path> = self.loading_stack.iter().map(PathBuf::as_path).collect();
            return Err(import_cycle(path, &chain));
        }
        self.loading_set.insert(path.to_path_buf());
        self.loading_stack.push(path.to_path_buf());
        Ok(())
    }

    /// Leave the innermost import.
    pub fn finish_import(&mut self) {
        if let Some(popped) = self.loading_stack.pop() {
            self.loading_set.remove(&popped);
        }
    }

    /// Load and parse the stylesheet at `path`.
    ///
    /// With `once`, the source is parsed at most once per context: later
    /// once-requests receive a copy of the cached tree. Imports inside the
    /// returned tree are stamped with the directory of `path`.
    pub fn load_stylesheet(&mut self, path: &Path, once: bool) -> LessResult<Stylesheet> {
        if once {
            if let Some(cached) = self.once_cache.get(path) {
                tracing::debug!(path = %path.display(), "reusing once-import");
                return Ok(cached.clone());
            }
        }

        let source = self.loader.load(path)?;
        let parser = self
            .parser
            .as_ref()
            .ok_or_else(|| import_failed(path, "no stylesheet parser is configured"))?;
        let sheet = parser.parse(&source, path)?;
        self.parse_count += 1;
        tracing::debug!(path = %path.display(), parses = self.parse_count, "parsed import");

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let sheet = Stylesheet {
            block: stamp_base_dir(sheet.block, &base_dir),
            span: sheet.span,
        };
        if once {
            self.once_cache.insert(path.to_path_buf(), sheet.clone());
        }
        Ok(sheet)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .field("root_dir", &self.root_dir)
            .field("import_chain", &self.loading_stack)
            .field("parse_count", &self.parse_count)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
    interner: Option<SharedInterner>,
    options: Options,
    loader: Option<Box<dyn SourceLoader>>,
    parser: Option<Box<dyn StylesheetParser>>,
    root: Option<PathBuf>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        ContextBuilder::default()
    }

    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: impl StylesheetParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Path of the root stylesheet. Relative imports in the root resolve
    /// against its directory, and importing it again is a cycle.
    #[must_use]
    pub fn root(mut self, path: impl AsRef<Path>) -> Self {
        self.root = Some(normalize_path(path.as_ref()));
        self
    }

    pub fn build(self) -> Context {
        let mut ctx = Context {
            interner: self.interner.unwrap_or_default(),
            options: self.options,
            loader: self
                .loader
                .unwrap_or_else(|| Box::new(MemoryLoader::default())),
            parser: self.parser,
            root_dir: None,
            once_cache: FxHashMap::default(),
            loading_stack: Vec::new(),
            loading_set: FxHashSet::default(),
            parse_count: 0,
        };
        if let Some(root) = self.root {
            ctx.root_dir = root.parent().map(Path::to_path_buf);
            ctx.loading_set.insert(root.clone());
            ctx.loading_stack.push(root);
        }
        ctx
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Record `dir` as the base directory of every import in `block` that does
/// not already have one.
fn stamp_base_dir(block: Block, dir: &Path) -> Block {
    let rules = block
        .into_rules()
        .into_iter()
        .map(|node| stamp_node(node, dir))
        .collect();
    Block::with_rules(rules)
}

fn stamp_node(node: Node, dir: &Path) -> Node {
    match node {
        Node::Import(import) => Node::Import(stamp_import(import, dir)),
        Node::Stylesheet(mut n) => {
            n.block = stamp_base_dir(n.block, dir);
            Node::Stylesheet(n)
        }
        Node::Ruleset(mut n) => {
            n.block = stamp_base_dir(n.block, dir);
            Node::Ruleset(n)
        }
        Node::Media(mut n) => {
            n.block = stamp_base_dir(n.block, dir);
            Node::Media(n)
        }
        Node::BlockDirective(mut n) => {
            n.block = stamp_base_dir(n.block, dir);
            Node::BlockDirective(n)
        }
        Node::Mixin(mut n) => {
            n.block = stamp_base_dir(n.block, dir);
            Node::Mixin(n)
        }
        other @ (Node::Rule(_)
        | Node::Definition(_)
        | Node::Directive(_)
        | Node::Comment(_)
        | Node::ImportMarker(_)
        | Node::MixinCall(_)) => other,
    }
}

fn stamp_import(mut import: Import, dir: &Path) -> Import {
    if import.base_dir.is_none() {
        import.base_dir = Some(dir.to_path_buf());
    }
    import
}

#[cfg(test)]
mod tests;
