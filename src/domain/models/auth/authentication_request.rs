//! 인증 미들웨어 역할 요구사항

use crate::domain::entities::users::user::Role;

/// 라우트 접근에 필요한 역할 (나열된 역할 중 하나면 통과)
#[derive(Debug, Clone)]
pub struct RequiredRole(Vec<Role>);

impl RequiredRole {
    pub fn any(roles: impl Into<Vec<Role>>) -> Self {
        RequiredRole(roles.into())
    }

    /// 관리 기능용 요구사항 (admin 또는 superAdmin)
    pub fn admin() -> Self {
        Self::any([Role::Admin, Role::SuperAdmin])
    }

    pub fn is_satisfied(&self, role: &Role) -> bool {
        self.0.contains(role)
    }
}
