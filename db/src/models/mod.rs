pub mod attendance_record;
pub mod class_period;
pub mod leave_request;
pub mod leave_type;
pub mod roll_call;
pub mod roll_call_record;
pub mod school_class;
pub mod semester;
pub mod setting;
pub mod time_slot;
pub mod user;
pub mod user_class_role;

pub use attendance_record::Entity as AttendanceRecord;
pub use class_period::Entity as ClassPeriod;
pub use leave_request::Entity as LeaveRequest;
pub use leave_type::Entity as LeaveType;
pub use roll_call::Entity as RollCall;
pub use roll_call_record::Entity as RollCallRecord;
pub use school_class::Entity as SchoolClass;
pub use semester::Entity as Semester;
pub use setting::Entity as Setting;
pub use time_slot::Entity as TimeSlot;
pub use user::Entity as User;
pub use user_class_role::Entity as UserClassRole;
