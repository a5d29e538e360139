//! Route Classification Table
//!
//! Every storefront path the access controller cares about is listed once, as a
//! `(pattern, class)` pair. Classes may overlap; `classify` reports every class whose
//! pattern matches and leaves precedence to the decision rules in `policy`.

/// RouteClass
///
/// The four access categories a page path can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Marketing and catalog pages. No rule restricts them.
    Public,
    /// Login and registration surfaces. Authenticated visitors are sent home.
    AuthOnly,
    /// Pages that need a session token.
    Protected,
    /// The admin back-office.
    AdminOnly,
}

impl RouteClass {
    fn bit(self) -> u8 {
        match self {
            RouteClass::Public => 1,
            RouteClass::AuthOnly => 1 << 1,
            RouteClass::Protected => 1 << 2,
            RouteClass::AdminOnly => 1 << 3,
        }
    }
}

/// RoutePattern
///
/// The three matching shapes used by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePattern {
    /// The normalized path equals the literal.
    Exact(&'static str),
    /// The normalized path equals the literal or continues it with a `/` segment.
    Prefix(&'static str),
    /// The literal followed by exactly one non-empty segment (`/product/:slug`).
    SingleSegment(&'static str),
}

impl RoutePattern {
    pub fn matches(&self, normalized: &str) -> bool {
        match *self {
            RoutePattern::Exact(literal) => normalized == literal,
            RoutePattern::Prefix(prefix) => matches_prefix(normalized, prefix),
            RoutePattern::SingleSegment(parent) => normalized
                .strip_prefix(parent)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|segment| !segment.is_empty() && !segment.contains('/')),
        }
    }
}

/// ROUTE_TABLE
///
/// The storefront's page map.
pub const ROUTE_TABLE: &[(RoutePattern, RouteClass)] = &[
    // Public
    (RoutePattern::Exact("/"), RouteClass::Public),
    (RoutePattern::Prefix("/shop"), RouteClass::Public),
    (RoutePattern::Prefix("/products"), RouteClass::Public),
    (RoutePattern::Prefix("/about"), RouteClass::Public),
    (RoutePattern::Prefix("/contact"), RouteClass::Public),
    (RoutePattern::SingleSegment("/product"), RouteClass::Public),
    // Auth-only
    (RoutePattern::Exact("/login"), RouteClass::AuthOnly),
    (RoutePattern::Exact("/register"), RouteClass::AuthOnly),
    // Protected
    (RoutePattern::Prefix("/user"), RouteClass::Protected),
    (RoutePattern::Exact("/cart"), RouteClass::Protected),
    (RoutePattern::Exact("/favorites"), RouteClass::Protected),
    (RoutePattern::Exact("/build-bouquet"), RouteClass::Protected),
    (RoutePattern::Prefix("/checkout"), RouteClass::Protected),
    // Admin-only
    (RoutePattern::Prefix("/admin"), RouteClass::AdminOnly),
];

/// RouteClasses
///
/// The set of classes a single path belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteClasses(u8);

impl RouteClasses {
    pub fn insert(&mut self, class: RouteClass) {
        self.0 |= class.bit();
    }

    pub fn contains(&self, class: RouteClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// normalize_path
///
/// Drops trailing slashes so `/admin/` and `/admin` classify identically. The root
/// path (and an empty path) normalize to `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Segment-boundary prefix test: `/admin` matches `/admin` and `/admin/users`, never
/// `/administrator`.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// classify
///
/// Evaluates `path` against every entry of `ROUTE_TABLE`.
pub fn classify(path: &str) -> RouteClasses {
    let normalized = normalize_path(path);

    ROUTE_TABLE
        .iter()
        .filter(|(pattern, _)| pattern.matches(normalized))
        .fold(RouteClasses::default(), |mut classes, (_, class)| {
            classes.insert(*class);
            classes
        })
}
