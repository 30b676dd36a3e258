//! Central place for metric keys
pub const USER_REGISTERED: &str = "user.registered";
pub const USER_LOGIN: &str = "user.login";
pub const LOGIN_FAILED: &str = "user.login_failed";
pub const TRIP_CREATED: &str = "trip.created";
pub const TRIP_DELETED: &str = "trip.deleted";
