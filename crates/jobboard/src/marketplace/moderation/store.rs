use super::domain::{EntityFlags, ModerationTarget};
use crate::marketplace::notifications::RawRemark;
use crate::marketplace::RepositoryError;

/// Single-document flag storage. Absent entities report `NotFound`.
pub trait ModerationStore: Send + Sync {
    fn flags(&self, target: &ModerationTarget) -> Result<EntityFlags, RepositoryError>;
    fn update_flag(
        &self,
        target: &ModerationTarget,
        field: &str,
        value: bool,
    ) -> Result<EntityFlags, RepositoryError>;
    fn append_remark(&self, company_id: &str, remark: RawRemark) -> Result<(), RepositoryError>;
}
