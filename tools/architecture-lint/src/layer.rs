//! Hexagon layers and the dependencies each one may not take.

use std::fmt;

use camino::Utf8Path;

/// Top-level module directories under `backend/src` that the lint inspects.
pub const LINTED_ROOTS: [&str; 3] = ["domain", "inbound", "outbound"];

/// Name the backend crate is imported under from integration code.
pub const CRATE_NAME: &str = "circle";

const WEB_STACK: &[&str] = &["actix_http", "actix_session", "actix_web", "utoipa"];
const STORAGE_STACK: &[&str] = &["diesel", "diesel_async", "diesel_migrations"];
const CRYPTO_STACK: &[&str] = &["argon2"];

/// One ring of the hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    /// Layer owning a path relative to `backend/src`, if any.
    pub fn of(relative: &Utf8Path) -> Option<Self> {
        match relative.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    /// Sibling modules this layer must not import.
    pub const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    /// Whether `krate` belongs to an adapter stack this layer must not touch.
    ///
    /// The domain stays free of every adapter stack. Inbound adapters speak
    /// HTTP but never storage or hashing; outbound adapters the reverse.
    pub fn forbids_crate(self, krate: &str) -> bool {
        let stacks: &[&[&str]] = match self {
            Self::Domain => &[WEB_STACK, STORAGE_STACK, CRYPTO_STACK],
            Self::Inbound => &[STORAGE_STACK, CRYPTO_STACK],
            Self::Outbound => &[WEB_STACK],
        };
        stacks.iter().any(|stack| stack.contains(&krate))
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        })
    }
}
