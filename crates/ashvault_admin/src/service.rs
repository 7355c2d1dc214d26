use ashvault_store::Repositories;

/// Admin operations over locations and users.
#[derive(Clone)]
pub struct AdminService {
    pub(crate) repos: Repositories,
}

impl AdminService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}
