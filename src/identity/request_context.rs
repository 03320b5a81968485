/// Opaque per-request data handed to every backend and carried in failure
/// events. The dispatcher never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub remote_addr: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self { request_id: None, remote_addr: None, user_agent: None }
    }
}
