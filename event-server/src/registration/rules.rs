//! 格式校验之后执行的业务规则

use super::form::{EMPLOYEE_EMAIL, EMPLOYEE_VEGETARIANS, FieldError, FieldErrorKind};

/// 员工本人、可选的同伴以及孩子
pub fn total_people(kids: i64, brings_plus_one: bool) -> i64 {
    kids + i64::from(brings_plus_one) + 1
}

/// 素食人数不得超过出席人数
pub fn check_vegetarians(
    vegetarians: i64,
    kids: i64,
    brings_plus_one: bool,
) -> Result<(), FieldError> {
    let total = total_people(kids, brings_plus_one);
    if vegetarians > total {
        return Err(FieldError::new(
            EMPLOYEE_VEGETARIANS,
            FieldErrorKind::VegetarianCountExceeded,
            format!(
                "The number of vegetarians - {vegetarians} is higher than number of people - {total}."
            ),
        ));
    }
    Ok(())
}

/// 邮箱已被使用时挂在邮箱字段上的错误
pub fn duplicate_email(email: &str) -> FieldError {
    FieldError::new(
        EMPLOYEE_EMAIL,
        FieldErrorKind::DuplicateEmail,
        format!("Sorry, the email address - {email} already registered for annual event."),
    )
}
