//! Target path decomposition.
//!
//! A target name has the shape `<grist>dir/base.suffix(member)`. The
//! variable modifiers `:G :R :D :B :S :M :P` select and replace these parts,
//! and [`PathParts::build`] puts them back together.

use ham_types::{Behavior, PathRootReplacerSlash};

/// The six addressable parts of a target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathPart {
    Grist,
    Root,
    Directory,
    BaseName,
    Suffix,
    ArchiveMember,
}

impl PathPart {
    pub const ALL: [PathPart; 6] = [
        PathPart::Grist,
        PathPart::Root,
        PathPart::Directory,
        PathPart::BaseName,
        PathPart::Suffix,
        PathPart::ArchiveMember,
    ];

    /// Map a modifier letter to the part it addresses.
    pub fn from_modifier(letter: char) -> Option<PathPart> {
        match letter {
            'G' => Some(PathPart::Grist),
            'R' => Some(PathPart::Root),
            'D' => Some(PathPart::Directory),
            'B' => Some(PathPart::BaseName),
            'S' => Some(PathPart::Suffix),
            'M' => Some(PathPart::ArchiveMember),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A decomposed path.
///
/// The grist keeps its angle brackets and the suffix keeps its leading dot.
/// The root is never produced by [`PathParts::parse`]; it only exists when
/// a `:R=` modifier supplies one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParts {
    pub grist: String,
    pub root: String,
    pub directory: String,
    pub base_name: String,
    pub suffix: String,
    pub archive_member: String,
}

impl PathParts {
    pub fn parse(path: &str) -> PathParts {
        let mut parts = PathParts::default();
        let mut rest = path;

        if rest.starts_with('<') {
            if let Some(close) = rest.find('>') {
                parts.grist = rest[..=close].to_string();
                rest = &rest[close + 1..];
            }
        }

        if let Some(slash) = rest.rfind('/') {
            // "/" on its own is the directory, not an empty string.
            parts.directory = if slash == 0 {
                "/".to_string()
            } else {
                rest[..slash].to_string()
            };
            rest = &rest[slash + 1..];
        }

        let mut end = rest.len();
        if rest.ends_with(')') {
            if let Some(open) = rest.find('(') {
                parts.archive_member = rest[open + 1..rest.len() - 1].to_string();
                end = open;
            }
        }

        let file = &rest[..end];
        match file.rfind('.') {
            Some(dot) => {
                parts.base_name = file[..dot].to_string();
                parts.suffix = file[dot..].to_string();
            }
            None => parts.base_name = file.to_string(),
        }

        parts
    }

    pub fn get(&self, part: PathPart) -> &str {
        match part {
            PathPart::Grist => &self.grist,
            PathPart::Root => &self.root,
            PathPart::Directory => &self.directory,
            PathPart::BaseName => &self.base_name,
            PathPart::Suffix => &self.suffix,
            PathPart::ArchiveMember => &self.archive_member,
        }
    }

    pub fn set(&mut self, part: PathPart, value: impl Into<String>) {
        let value = value.into();
        match part {
            PathPart::Grist => self.grist = value,
            PathPart::Root => self.root = value,
            PathPart::Directory => self.directory = value,
            PathPart::BaseName => self.base_name = value,
            PathPart::Suffix => self.suffix = value,
            PathPart::ArchiveMember => self.archive_member = value,
        }
    }

    /// Reduce the path to its directory.
    pub fn to_parent(&mut self) {
        self.base_name.clear();
        self.suffix.clear();
        self.archive_member.clear();
    }

    pub fn build(&self, behavior: &Behavior) -> String {
        let mut out = String::new();

        if !self.grist.is_empty() {
            if !self.grist.starts_with('<') {
                out.push('<');
            }
            out.push_str(&self.grist);
            if !self.grist.ends_with('>') {
                out.push('>');
            }
        }

        let root_is_dot = self.root == ".";
        let directory_is_absolute = self.directory.starts_with('/');
        if !self.root.is_empty() && !root_is_dot && !directory_is_absolute {
            out.push_str(&self.root);
            let add_slash = match behavior.path_root_replacer_slash() {
                PathRootReplacerSlash::PathRootReplacerSlashAlways => true,
                PathRootReplacerSlash::PathRootReplacerSlashAvoidDuplicate => {
                    !self.root.ends_with('/')
                }
            };
            if add_slash {
                out.push('/');
            }
        }

        out.push_str(&self.directory);

        if !self.directory.is_empty()
            && (!self.base_name.is_empty() || !self.suffix.is_empty())
            && self.directory != "/"
        {
            out.push('/');
        }

        out.push_str(&self.base_name);
        out.push_str(&self.suffix);

        if !self.archive_member.is_empty() {
            out.push('(');
            out.push_str(&self.archive_member);
            out.push(')');
        }

        out
    }
}
