// Services layer for business logic
// Services own account rules, calling storage directly

pub mod users;

pub use users::UserService;
