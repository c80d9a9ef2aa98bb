use indexmap::IndexMap;

use crate::domain::ArchiveEntry;
use crate::error::TreeError;

/// Directory view of an archive listing. The root is an unnamed `Directory`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryNode {
    Leaf,
    Directory(Children),
}

/// Child segments of a directory, kept in first-seen order. Equality ignores
/// that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children(IndexMap<String, DirectoryNode>);

impl Children {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DirectoryNode> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectoryNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn dir_mut(&mut self, name: &str) -> &mut Children {
        self.0
            .entry(name.to_string())
            .or_insert_with(DirectoryNode::empty_dir)
            .promote()
    }

    fn touch_leaf(&mut self, name: &str) {
        // an existing directory keeps its children
        self.0.entry(name.to_string()).or_insert(DirectoryNode::Leaf);
    }
}

impl DirectoryNode {
    pub fn empty_dir() -> Self {
        DirectoryNode::Directory(Children::default())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DirectoryNode::Leaf)
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            DirectoryNode::Leaf => None,
            DirectoryNode::Directory(c) => Some(c),
        }
    }

    /// Look up a slash-delimited path below this node.
    pub fn get(&self, path: &str) -> Option<&DirectoryNode> {
        path.split('/')
            .try_fold(self, |node, seg| node.children()?.get(seg))
    }

    /// Longest chain of segments below this node.
    pub fn depth(&self) -> usize {
        match self {
            DirectoryNode::Leaf => 0,
            DirectoryNode::Directory(c) => c.iter().map(|(_, n)| 1 + n.depth()).max().unwrap_or(0),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            DirectoryNode::Leaf => 1,
            DirectoryNode::Directory(c) => c.iter().map(|(_, n)| n.leaf_count()).sum(),
        }
    }

    /// Full paths of every leaf, in display order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(self, &mut String::new(), &mut out);
        out
    }

    fn promote(&mut self) -> &mut Children {
        if self.is_leaf() {
            *self = DirectoryNode::empty_dir();
        }
        match self {
            DirectoryNode::Directory(c) => c,
            DirectoryNode::Leaf => unreachable!("leaf promoted above"),
        }
    }
}

fn collect_leaves(node: &DirectoryNode, prefix: &mut String, out: &mut Vec<String>) {
    let Some(children) = node.children() else {
        out.push(prefix.clone());
        return;
    };
    for (name, child) in children.iter() {
        let mark = prefix.len();
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(name);
        collect_leaves(child, prefix, out);
        prefix.truncate(mark);
    }
}

fn segments(path: &str) -> Result<Vec<&str>, TreeError> {
    let segs: Vec<&str> = path.split('/').collect();
    if segs.iter().any(|s| s.is_empty()) {
        return Err(TreeError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segs)
}

/// Incremental tree construction. A node that ever gains a child stays a
/// directory, whatever order paths arrive in.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Children,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&mut self, path: &str) -> Result<(), TreeError> {
        let segs = segments(path)?;
        if let Some((last, parents)) = segs.split_last() {
            self.parent_of(parents).touch_leaf(last);
        }
        Ok(())
    }

    /// Explicit directory record; shows as a directory even with no children.
    pub fn insert_dir(&mut self, path: &str) -> Result<(), TreeError> {
        let segs = segments(path)?;
        self.parent_of(&segs);
        Ok(())
    }

    pub fn finish(self) -> DirectoryNode {
        DirectoryNode::Directory(self.root)
    }

    fn parent_of(&mut self, segs: &[&str]) -> &mut Children {
        segs.iter().fold(&mut self.root, |cur, seg| cur.dir_mut(seg))
    }
}

/// Build a tree from slash-delimited paths. Fails on the first path with an
/// empty segment.
pub fn build_tree<I, S>(paths: I) -> Result<DirectoryNode, TreeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut b = TreeBuilder::new();
    for p in paths {
        b.insert_file(p.as_ref())?;
    }
    Ok(b.finish())
}

/// Build a tree from an engine listing. Invalid paths are skipped and
/// returned alongside the tree.
pub fn build_entry_tree(entries: &[ArchiveEntry]) -> (DirectoryNode, Vec<TreeError>) {
    let mut b = TreeBuilder::new();
    let mut rejected = Vec::new();
    for e in entries {
        let res = if e.is_dir {
            b.insert_dir(&e.path)
        } else {
            b.insert_file(&e.path)
        };
        if let Err(err) = res {
            rejected.push(err);
        }
    }
    (b.finish(), rejected)
}
