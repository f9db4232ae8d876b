//! 统一错误处理
//!
//! 应用错误类型来自 `shared::error`，这里补充存储层错误到 [`AppError`] 的转换。
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 通用错误 | E0003 资源不存在 |
//! | E1xxx | 报名错误 | E1002 邮箱已报名 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::database("connection closed"))
//!
//! // 返回成功响应
//! Ok(ApiResponse::success(data))
//! ```

pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(constraint) => {
                AppError::with_message(ErrorCode::AlreadyExists, "Record already exists")
                    .with_detail("constraint", constraint)
            }
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// 创建成功响应
pub fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}
