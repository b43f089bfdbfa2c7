/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const SESSIONS_ROUTE_COMPONENT: &str = "sessions";
pub const SESSIONS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", SESSIONS_ROUTE_COMPONENT);

pub const RECURRING_ROUTE_COMPONENT: &str = "recurring";
pub const RECURRING_ROUTE_PREFIX: &str =
    const_str::concat!(SESSIONS_ROUTE_PREFIX, "/", RECURRING_ROUTE_COMPONENT);

pub const BOOKINGS_ROUTE_COMPONENT: &str = "bookings";
pub const BOOKINGS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", BOOKINGS_ROUTE_COMPONENT);

/// Header set by the identity proxy in front of the API.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Upper bound on the number of sessions a single recurrence rule may produce.
pub const MAX_RECURRING_OCCURRENCES: usize = 52;
