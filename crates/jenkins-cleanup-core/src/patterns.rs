//! Name-pattern tables and entry classification.
//!
//! The tables are fixed at build time. Prefix and suffix rules are plain
//! string comparisons: `"*.jpg"` in the file-prefix table matches a file
//! literally named `*.jpg...`, it is never expanded as a glob. Directory
//! regexes must match the whole name, not a substring.
use regex::Regex;
use std::fs::Metadata;
use std::sync::LazyLock;

/// Files whose name starts with one of these are leftovers.
pub const FILE_PREFIXES: &[&str] = &[
    "cargo-jvm-version-",
    "winstone",
    "gwt",
    "cargo-jvm-version",
    "sonar-scanner-api-batch",
    "jffi",
    "+~JF",
    "tmp",
    "evoccs",
    "dse_blanko_d2eentwi_",
    "imageio",
    "hudson",
    "*.jpg",
    "desugar_deploy.jar",
    "haste-map-",
    "stockimport",
    "junit",
    "maven-build",
];

/// Files whose name ends with one of these are leftovers.
pub const FILE_SUFFIXES: &[&str] = &[".jpg"];

/// Directories whose name starts with one of these are leftovers.
pub const DIRECTORY_PREFIXES: &[&str] = &[
    "jenkins-remoting",
    "tomcat",
    "jetty-",
    "jbd_tmp_",
    "jbd_classpath_",
    "npm-",
    "ansible_",
    "ansible-tmp-",
    "metro-cache-",
    "metro-bundler-cache-",
    "resource-",
];

/// Directories whose whole name matches one of these are leftovers:
/// numbered `tmpNNN` scratch dirs, 8-digit hex dirs and UUID dirs.
pub const DIRECTORY_PATTERNS: &[&str] = &[
    "tmp[0-9]+",
    "[0-9a-f]{8}",
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
];

static BUILTIN: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::new(
        FILE_PREFIXES,
        FILE_SUFFIXES,
        DIRECTORY_PREFIXES,
        DIRECTORY_PATTERNS,
    )
    .expect("built-in directory patterns are valid regexes")
});

/// What kind of filesystem object an entry resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, FIFOs, devices. Never matched.
    Other,
}

impl EntryKind {
    pub fn from_metadata(meta: &Metadata) -> Self {
        if meta.is_file() {
            Self::File
        } else if meta.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// The rule that made an entry eligible, with the table entry that hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    FilePrefix(&'static str),
    FileSuffix(&'static str),
    DirectoryPrefix(&'static str),
    DirectoryPattern(&'static str),
}

impl Match {
    /// Short label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::FilePrefix(_) => "file prefix",
            Self::FileSuffix(_) => "file suffix",
            Self::DirectoryPrefix(_) => "directory prefix",
            Self::DirectoryPattern(_) => "directory pattern",
        }
    }

    /// The table entry that matched.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::FilePrefix(p)
            | Self::FileSuffix(p)
            | Self::DirectoryPrefix(p)
            | Self::DirectoryPattern(p) => p,
        }
    }
}

/// The four ordered matcher lists.
#[derive(Debug)]
pub struct PatternTable {
    file_prefixes: &'static [&'static str],
    file_suffixes: &'static [&'static str],
    directory_prefixes: &'static [&'static str],
    directory_patterns: Vec<(&'static str, Regex)>,
}

impl PatternTable {
    /// Build a table. Directory patterns are anchored at both ends so they
    /// only ever match a full name.
    pub fn new(
        file_prefixes: &'static [&'static str],
        file_suffixes: &'static [&'static str],
        directory_prefixes: &'static [&'static str],
        directory_patterns: &'static [&'static str],
    ) -> Result<Self, regex::Error> {
        let directory_patterns = directory_patterns
            .iter()
            .map(|&p| Regex::new(&format!("^(?:{p})$")).map(|re| (p, re)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            file_prefixes,
            file_suffixes,
            directory_prefixes,
            directory_patterns,
        })
    }

    /// The compiled built-in table, shared for the life of the process.
    pub fn builtin() -> &'static PatternTable {
        &BUILTIN
    }

    /// Return the first rule matching `name`, or `None` if the entry must be
    /// left alone. Tables are consulted in order: prefixes before suffixes
    /// for files, prefixes before regexes for directories.
    pub fn classify(&self, name: &str, kind: EntryKind) -> Option<Match> {
        match kind {
            EntryKind::File => self
                .file_prefixes
                .iter()
                .copied()
                .find(|p| name.starts_with(p))
                .map(Match::FilePrefix)
                .or_else(|| {
                    self.file_suffixes
                        .iter()
                        .copied()
                        .find(|s| name.ends_with(s))
                        .map(Match::FileSuffix)
                }),
            EntryKind::Directory => self
                .directory_prefixes
                .iter()
                .copied()
                .find(|p| name.starts_with(p))
                .map(Match::DirectoryPrefix)
                .or_else(|| {
                    self.directory_patterns
                        .iter()
                        .find(|(_, re)| re.is_match(name))
                        .map(|&(p, _)| Match::DirectoryPattern(p))
                }),
            EntryKind::Other => None,
        }
    }
}
