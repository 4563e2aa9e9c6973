//! Wire data models for the oxidir CLI

pub mod auth;
pub mod directory;
pub mod group;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, MeResponse};
pub use directory::{ApiErrorBody, HealthResponse, MessageResponse, TreeResponse};
pub use group::{
    CreateGroupRequest, GroupListResponse, GroupRecord, MemberListResponse, MemberRequest,
    UserGroupsResponse,
};
pub use user::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserRecord};
