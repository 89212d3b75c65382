use serde::Serialize;

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证与账号；3xxx 学生与记录；4xxx 资料文件；5xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserEmailInvalid = 2002,
    UserEmailAlreadyExists = 2003,
    UserPasswordInvalid = 2004,
    UserNotFound = 2005,
    UserUpdateFailed = 2006,
    UserInactive = 2007,
    ResetTokenInvalid = 2008,
    ProfileNotFound = 2010,
    ProfileRoleInvalid = 2011,
    CanNotDemoteCurrentUser = 2012,

    StudentNotFound = 3000,
    StudentNameInvalid = 3001,
    StudentParentInvalid = 3002,
    StudentOperationFailed = 3003,
    AttendanceInvalid = 3100,
    AttendanceOperationFailed = 3101,
    ProgressNotFound = 3200,
    ProgressInvalid = 3201,
    ProgressOperationFailed = 3202,
    FeedbackNotFound = 3300,
    FeedbackContentEmpty = 3301,
    FeedbackOperationFailed = 3302,

    MaterialNotFound = 4000,
    MaterialTitleInvalid = 4001,
    FileUploadFailed = 4002,
    FileTypeNotAllowed = 4003,
    FileSizeExceeded = 4004,
    FileNotFound = 4005,
    MultifileUploadNotAllowed = 4006,
    DownloadLinkInvalid = 4007,

    InternalServerError = 5000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::StudentNotFound as i32, 3000);
        assert_eq!(ErrorCode::InternalServerError as i32, 5000);
    }
}
