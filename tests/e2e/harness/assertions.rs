use anyhow::Result;
use attn_core::{SkipReason, Workspace};

/// Declarative assertions on tree state
pub enum Assertion {
    // Attribute store contents
    FacetExists {
        dir: String,
        facet: String,
    },
    FacetMissing {
        dir: String,
        facet: String,
    },
    FacetValue {
        dir: String,
        facet: String,
        key: String,
        value: f64,
    },
    /// The stored identity of `File:<file>` equals the blob hash of the file
    IdentityCurrent {
        dir: String,
        file: String,
    },
    IdentityChanged {
        dir: String,
        file: String,
    },

    // Result of the last synchronizer operation
    Created(usize),
    Updated(usize),
    Removed(usize),
    Skipped(SkipReason),
    DirectoriesProcessed(usize),

    // Resolved views
    ResolvedAttribute {
        path: String,
        facet: String,
        key: String,
        value: f64,
    },
    ResolvedPriority {
        path: String,
        facet: String,
        key: String,
        value: f64,
    },
    ResolvedLacksFacet {
        path: String,
        facet: String,
    },

    // Rankings
    UrgencySorted,
    TopUrgency {
        facet: String,
        attribute: String,
    },
    RankedItems(usize),

    // Custom
    Custom(Box<dyn Fn(&Workspace) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FacetExists { dir, facet } => {
                write!(f, "FacetExists {{ dir: {:?}, facet: {:?} }}", dir, facet)
            }
            Self::FacetMissing { dir, facet } => {
                write!(f, "FacetMissing {{ dir: {:?}, facet: {:?} }}", dir, facet)
            }
            Self::FacetValue {
                dir,
                facet,
                key,
                value,
            } => write!(
                f,
                "FacetValue {{ dir: {:?}, facet: {:?}, key: {:?}, value: {} }}",
                dir, facet, key, value
            ),
            Self::IdentityCurrent { dir, file } => {
                write!(f, "IdentityCurrent {{ dir: {:?}, file: {:?} }}", dir, file)
            }
            Self::IdentityChanged { dir, file } => {
                write!(f, "IdentityChanged {{ dir: {:?}, file: {:?} }}", dir, file)
            }
            Self::Created(n) => write!(f, "Created({})", n),
            Self::Updated(n) => write!(f, "Updated({})", n),
            Self::Removed(n) => write!(f, "Removed({})", n),
            Self::Skipped(reason) => write!(f, "Skipped({:?})", reason),
            Self::DirectoriesProcessed(n) => write!(f, "DirectoriesProcessed({})", n),
            Self::ResolvedAttribute {
                path,
                facet,
                key,
                value,
            } => write!(
                f,
                "ResolvedAttribute {{ path: {:?}, facet: {:?}, key: {:?}, value: {} }}",
                path, facet, key, value
            ),
            Self::ResolvedPriority {
                path,
                facet,
                key,
                value,
            } => write!(
                f,
                "ResolvedPriority {{ path: {:?}, facet: {:?}, key: {:?}, value: {} }}",
                path, facet, key, value
            ),
            Self::ResolvedLacksFacet { path, facet } => {
                write!(f, "ResolvedLacksFacet {{ path: {:?}, facet: {:?} }}", path, facet)
            }
            Self::UrgencySorted => write!(f, "UrgencySorted"),
            Self::TopUrgency { facet, attribute } => {
                write!(f, "TopUrgency {{ facet: {:?}, attribute: {:?} }}", facet, attribute)
            }
            Self::RankedItems(n) => write!(f, "RankedItems({})", n),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
