//! API models: entities, closed enums, and request/response payloads

pub mod house;
pub mod interest;
pub mod user;

// Re-export for convenience
pub use house::{
    Amenities, CreateHouseRequest, House, HouseSummary, HouseUpdate, HouseWithOwner, ListingQuery,
    ListingStatus, NewHouse, OwnerSummary, Pagination, PropertyType, UpdateHouseRequest,
};
pub use interest::{
    ContactSummary, CreateInterestRequest, Interest, InterestHouseView, InterestStatus,
    OwnerInterestView, TenantInterestView,
};
pub use user::{
    LoginRequest, NewUser, ProfileResponse, ProfileUpdate, RegisterRequest, Role,
    UpdateProfileRequest, User, UserResponse,
};
