use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attrs {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Path of the backend that authenticated this principal. Filled in by
    /// the dispatcher on success; `None` for principals built elsewhere.
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub attrs: Attrs,
}
