//! 预导入模块，方便使用

pub use super::attendance::{
    ActiveModel as AttendanceActiveModel, Entity as Attendance, Model as AttendanceModel,
};
pub use super::feedback::{
    ActiveModel as FeedbackActiveModel, Entity as Feedback, Model as FeedbackModel,
};
pub use super::materials::{
    ActiveModel as MaterialActiveModel, Entity as Materials, Model as MaterialModel,
};
pub use super::password_resets::{
    ActiveModel as PasswordResetActiveModel, Entity as PasswordResets,
    Model as PasswordResetModel,
};
pub use super::profiles::{
    ActiveModel as ProfileActiveModel, Entity as Profiles, Model as ProfileModel,
};
pub use super::progress::{
    ActiveModel as ProgressActiveModel, Entity as Progress, Model as ProgressModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
