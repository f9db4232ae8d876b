//! Annual Event Server - 年会报名服务
//!
//! # 架构概述
//!
//! - **报名** (`registration`): 部门校验、表单校验、业务规则、持久化
//! - **计数区块** (`block`): 报名计数、计数钩子、渲染缓存
//! - **数据库** (`db`): SQLite 存储 (sqlx)
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! event-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── db/            # 连接池、仓储、存储接口
//! ├── registration/  # 报名流程
//! ├── block/         # 计数区块
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod block;
pub mod core;
pub mod db;
pub mod registration;
pub mod utils;

// Re-export 公共类型
pub use block::{CountAlter, CountAlterPipeline, CountContext};
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use registration::{RegistrationService, SubmissionOutcome};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (不存在时忽略)
/// 2. 创建工作目录
/// 3. 初始化日志
pub fn setup_environment() -> Result<Config, ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ___                          __
   /   |  ____  ____  __  ______ _/ /
  / /| | / __ \/ __ \/ / / / __ `/ /
 / ___ |/ / / / / / / /_/ / /_/ / /
/_/  |_/_/ /_/_/ /_/\__,_/\__,_/_/
    "#
    );
}
