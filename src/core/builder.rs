use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::{debug, trace};

use crate::core::error::DepError;
use crate::core::fs::{FileAccess, absolutize};
use crate::core::scanner::ReferenceScanner;
use crate::core::tree::{NodeId, NodeRef, Tree, TreeError};

pub const DEFAULT_MAX_DEPTH: usize = 100;

// ---------- Public types ----------

/// The dependency tree of a single entry file.
///
/// Keys are absolute paths. A file reachable along two separate branches
/// appears once per branch.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    tree: Tree,
    root: NodeId,
}

/// Recursively follows references from an entry file.
pub struct TreeBuilder<F> {
    fs: F,
    scanner: ReferenceScanner,
    max_depth: usize,
}

type VisitFuture<'a> = Pin<Box<dyn Future<Output = Result<NodeId, DepError>> + Send + 'a>>;

// ---------- Implementation ----------

impl DependencyTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Absolute path of the entry file.
    pub fn root_key(&self) -> &str {
        self.tree.key(self.root)
    }

    /// The underlying arena, for node-level queries.
    pub fn arena(&self) -> &Tree {
        &self.tree
    }

    pub fn is_ancestor_of<'a>(&'a self, target: impl Into<NodeRef<'a>>) -> bool {
        self.tree.is_ancestor_of(self.root, target)
    }

    pub fn contains<'a>(&'a self, target: impl Into<NodeRef<'a>>) -> bool {
        self.tree.contains(self.root, target)
    }

    pub fn num_nodes(&self) -> usize {
        self.tree.num_nodes(self.root)
    }

    pub fn depth(&self) -> usize {
        self.tree.depth(self.root)
    }

    pub fn flatten(&self) -> Vec<String> {
        self.tree.flatten(self.root)
    }
}

impl fmt::Display for DependencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree.render(self.root))
    }
}

impl<F: FileAccess> TreeBuilder<F> {
    pub fn new(fs: F, scanner: ReferenceScanner) -> Self {
        Self {
            fs,
            scanner,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build the dependency tree for `entry`.
    ///
    /// A relative entry is resolved against the file access base directory;
    /// references are resolved against the directory of the file that makes them.
    /// The first failure aborts the whole build.
    pub async fn build_tree(&self, entry: impl AsRef<Path>) -> Result<DependencyTree, DepError> {
        let base = self.fs.base_dir()?;
        let entry = absolutize(entry.as_ref(), &base);

        let mut tree = Tree::new();
        let root = self.visit(&mut tree, None, entry, 0).await?;

        debug!(
            entry = tree.key(root),
            nodes = tree.num_nodes(root),
            "built dependency tree"
        );
        Ok(DependencyTree { tree, root })
    }

    // ---------- Internal ----------

    /// Place `path` under `parent` (or as the root), then recurse into its references.
    fn visit<'a>(
        &'a self,
        tree: &'a mut Tree,
        parent: Option<NodeId>,
        path: PathBuf,
        depth: usize,
    ) -> VisitFuture<'a> {
        Box::pin(async move {
            if depth > self.max_depth {
                return Err(DepError::MaxDepthExceeded {
                    max_depth: self.max_depth,
                });
            }

            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| path.clone());

            if !self.fs.path_exists(&path).await? {
                return Err(DepError::access(
                    &path,
                    format!("no such file or directory: {}", path.display()),
                ));
            }

            let key = path.to_string_lossy().into_owned();
            let node = match parent {
                None => tree.insert_root(key),
                Some(parent) => match tree.add_child(parent, key) {
                    Ok(id) => id,
                    Err(TreeError::Cycle { key, .. }) => {
                        let root = tree.key(tree.root_of(parent)).to_string();
                        return Err(DepError::CircularDependency { path: key, root });
                    }
                    Err(other) => return Err(other.into()),
                },
            };

            let text = self.fs.read_text(&path).await?;
            let references = self.scanner.scan(&text);
            trace!(
                file = %path.display(),
                depth,
                references = references.len(),
                "scanned file"
            );

            for reference in references {
                let child = absolutize(Path::new(&reference), &dir);
                self.visit(&mut *tree, Some(node), child, depth + 1).await?;
            }

            Ok(node)
        })
    }
}

// ---------- Tests ----------
