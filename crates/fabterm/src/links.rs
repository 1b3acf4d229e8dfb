//! Site link table
//!
//! The pages the session can list and navigate to, plus the project's
//! external links. Internal routes resolve against the configured site URL.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A route on the site, e.g. `/docs`
    Route(&'static str),
    External(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, Copy)]
pub struct LinkEntry {
    /// Name shown by `ls`, e.g. `docs/`
    pub label: &'static str,
    pub kind: EntryKind,
    pub description: &'static str,
    pub target: Destination,
}

#[derive(Debug, Clone, Copy)]
pub struct ExternalLink {
    pub label: &'static str,
    pub url: &'static str,
}

const PAGES: &[LinkEntry] = &[
    LinkEntry {
        label: "docs/",
        kind: EntryKind::Directory,
        description: "Documentation and guides",
        target: Destination::Route("/docs"),
    },
    LinkEntry {
        label: "blog/",
        kind: EntryKind::Directory,
        description: "Articles and updates",
        target: Destination::Route("/blog"),
    },
    LinkEntry {
        label: "about.md",
        kind: EntryKind::File,
        description: "About the project",
        target: Destination::Route("/about"),
    },
    LinkEntry {
        label: "community.md",
        kind: EntryKind::File,
        description: "Join our community",
        target: Destination::Route("/community"),
    },
];

const EXTERNAL: &[ExternalLink] = &[
    ExternalLink {
        label: "source",
        url: "https://github.com/always-further/deepfabric",
    },
    ExternalLink {
        label: "documentation",
        url: "https://docs.deepfabric.dev",
    },
    ExternalLink {
        label: "discussions",
        url: "https://github.com/always-further/deepfabric/discussions",
    },
    ExternalLink {
        label: "discord",
        url: "https://discord.gg/pPcjYzGvbS",
    },
];

#[derive(Debug, Clone)]
pub struct LinkTable {
    base_url: String,
    pages: &'static [LinkEntry],
    external: &'static [ExternalLink],
}

impl LinkTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pages: PAGES,
            external: EXTERNAL,
        }
    }

    pub fn pages(&self) -> &[LinkEntry] {
        self.pages
    }

    pub fn external(&self) -> &[ExternalLink] {
        self.external
    }

    pub fn resolve(&self, destination: Destination) -> String {
        match destination {
            Destination::Route("/") => format!("{}/", self.base_url),
            Destination::Route(route) => format!("{}{}", self.base_url, route),
            Destination::External(url) => url.to_string(),
        }
    }

    /// The site root, listed as `./` by `ls -la`
    pub fn home(&self) -> Destination {
        Destination::Route("/")
    }

    /// Destination of a navigation builtin (`docs`, `blog`, ...)
    pub fn destination_for(&self, name: &str) -> Option<Destination> {
        let route = match name {
            "docs" => "/docs",
            "blog" => "/blog",
            "about" => "/about",
            "community" => "/community",
            _ => return None,
        };
        Some(Destination::Route(route))
    }
}
