use crate::errors::ClientError;
use std::collections::BTreeMap;
use std::fmt;

/// Path-addressable entity kinds recognized in page urls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Usuario,
    Proyecto,
    Equipo,
    Tarea,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Usuario,
        ResourceKind::Proyecto,
        ResourceKind::Equipo,
        ResourceKind::Tarea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Usuario => "usuario",
            ResourceKind::Proyecto => "proyecto",
            ResourceKind::Equipo => "equipo",
            ResourceKind::Tarea => "tarea",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers found in a page url, keyed by resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceContext {
    ids: BTreeMap<ResourceKind, String>,
}

impl ResourceContext {
    /// Scans the `/`-separated segments of `url` and records, for the first
    /// occurrence of each keyword, the segment right after it.
    pub fn from_url(url: &str) -> Self {
        let segments: Vec<&str> = strip_query(url).split('/').collect();
        let mut ids = BTreeMap::new();

        for kind in ResourceKind::ALL {
            let Some(index) = segments.iter().position(|segment| *segment == kind.as_str()) else {
                continue;
            };
            match segments.get(index + 1) {
                Some(value) if !value.is_empty() => {
                    ids.insert(kind, (*value).to_string());
                }
                _ => {}
            }
        }

        Self { ids }
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        self.ids.get(&kind).map(String::as_str)
    }

    pub fn require(&self, kind: ResourceKind) -> Result<&str, ClientError> {
        self.get(kind)
            .ok_or_else(|| ClientError::missing_resource(kind.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `/api/usuario/{u}`
    pub fn user_api_base(&self) -> Result<String, ClientError> {
        let user = self.require(ResourceKind::Usuario)?;
        Ok(format!("/api/usuario/{user}"))
    }

    /// `/api/usuario/{u}/proyecto/{p}`
    pub fn project_api_base(&self) -> Result<String, ClientError> {
        let project = self.require(ResourceKind::Proyecto)?;
        Ok(format!("{}/proyecto/{project}", self.user_api_base()?))
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}
