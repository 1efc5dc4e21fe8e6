use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, UpdateUserName, UpdateUserPassword},
        User,
    },
};
use serde::{Deserialize, Serialize};

const MAX_USER_NAME_LEN: usize = 100;

// 前後の空白を除いた表示名で長さを判定する
fn trimmed_user_name(value: &str, _: &()) -> garde::Result {
    let len = value.trim().chars().count();
    if (1..=MAX_USER_NAME_LEN).contains(&len) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "user name must be 1 to {MAX_USER_NAME_LEN} characters"
        )))
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            email,
            role,
        } = value;
        Self {
            user_id,
            user_name,
            email,
            role: RoleName::from(role),
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPasswordRequest {
    #[garde(length(min = 1))]
    current_password: String,
    #[garde(length(min = 8))]
    new_password: String,
}

#[derive(new)]
pub struct UpdateUserPasswordRequestWithUserId(UserId, UpdateUserPasswordRequest);

impl From<UpdateUserPasswordRequestWithUserId> for UpdateUserPassword {
    fn from(value: UpdateUserPasswordRequestWithUserId) -> Self {
        let UpdateUserPasswordRequestWithUserId(
            user_id,
            UpdateUserPasswordRequest {
                current_password,
                new_password,
            },
        ) = value;
        UpdateUserPassword {
            user_id,
            current_password,
            new_password,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(custom(trimmed_user_name))]
    user_name: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 8))]
    password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            user_name,
            email,
            password,
        } = value;
        Self {
            user_name: user_name.trim().to_string(),
            email,
            password,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserNameRequest {
    #[garde(custom(trimmed_user_name))]
    user_name: String,
}

#[derive(new)]
pub struct UpdateUserNameRequestWithUserId(UserId, UpdateUserNameRequest);

impl From<UpdateUserNameRequestWithUserId> for UpdateUserName {
    fn from(value: UpdateUserNameRequestWithUserId) -> Self {
        let UpdateUserNameRequestWithUserId(user_id, UpdateUserNameRequest { user_name }) = value;
        UpdateUserName {
            user_id,
            user_name: user_name.trim().to_string(),
        }
    }
}
