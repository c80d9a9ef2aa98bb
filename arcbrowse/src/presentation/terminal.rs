use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use arcbrowse_core::error::EngineError;
use arcbrowse_core::ui::{DisplaySink, FileSelector, PasswordSource};
use arcbrowse_core::{DirectoryNode, RecentFileRecord};
use async_trait::async_trait;
use time::macros::format_description;

/// Prints listings and history to stdout, engine errors to stderr.
pub struct TerminalDisplay {
    flat: bool,
}

impl TerminalDisplay {
    pub fn new(flat: bool) -> Self {
        Self { flat }
    }
}

impl DisplaySink for TerminalDisplay {
    fn show_tree(&self, archive: &Path, tree: &DirectoryNode) {
        let body = if self.flat {
            render_flat(tree)
        } else {
            render_tree(tree)
        };
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", archive.display());
        let _ = out.write_all(body.as_bytes());
    }

    fn show_recent(&self, records: &[RecentFileRecord]) {
        print!("{}", render_recent(records));
    }

    fn show_error(&self, _archive: &Path, error: &EngineError) {
        eprintln!("error: {error}");
    }
}

pub fn render_tree(tree: &DirectoryNode) -> String {
    let mut out = String::new();
    if let Some(children) = tree.children() {
        let n = children.len();
        for (i, (name, child)) in children.iter().enumerate() {
            render_node(&mut out, "", name, child, i + 1 == n);
        }
    }
    out
}

fn render_node(out: &mut String, prefix: &str, name: &str, node: &DirectoryNode, last: bool) {
    let branch = if last { "└── " } else { "├── " };
    let slash = if node.is_leaf() { "" } else { "/" };
    let _ = writeln!(out, "{prefix}{branch}{name}{slash}");
    if let Some(children) = node.children() {
        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        let n = children.len();
        for (i, (child_name, child)) in children.iter().enumerate() {
            render_node(out, &next, child_name, child, i + 1 == n);
        }
    }
}

pub fn render_flat(tree: &DirectoryNode) -> String {
    tree.leaf_paths()
        .into_iter()
        .fold(String::new(), |mut out, p| {
            let _ = writeln!(out, "{p}");
            out
        })
}

pub fn render_recent(records: &[RecentFileRecord]) -> String {
    if records.is_empty() {
        return "no recent archives\n".to_string();
    }
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    let mut out = String::from("Recent archives:\n");
    for r in records {
        let when = r
            .timestamp
            .to_offset(time::UtcOffset::UTC)
            .format(fmt)
            .unwrap_or_else(|_| r.timestamp.to_string());
        let _ = writeln!(out, "  {} (last accessed: {when})", r.path);
    }
    out
}

/// Reads one archive path from stdin; a blank line or EOF cancels.
pub struct StdinSelector;

#[async_trait]
impl FileSelector for StdinSelector {
    async fn select_archive(&self) -> Option<PathBuf> {
        tokio::task::spawn_blocking(|| {
            eprint!("archive path: ");
            let _ = std::io::stderr().flush();
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => None,
                Ok(_) => selection_from_input(&line),
            }
        })
        .await
        .ok()
        .flatten()
    }
}

/// Blank means cancelled. Existing paths are canonicalized so history
/// entries for the same archive collapse.
pub fn selection_from_input(line: &str) -> Option<PathBuf> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(canonical_or_given(PathBuf::from(trimmed)))
}

pub fn canonical_or_given(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

/// Hidden terminal prompt; an empty answer or a closed terminal declines.
pub struct TerminalPassword;

#[async_trait]
impl PasswordSource for TerminalPassword {
    async fn request_password(&self, archive: &Path) -> Option<String> {
        let prompt = format!("password for {}: ", archive.display());
        tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt).ok())
            .await
            .ok()
            .flatten()
            .filter(|p| !p.is_empty())
    }
}
