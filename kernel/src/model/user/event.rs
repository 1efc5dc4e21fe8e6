use crate::model::id::UserId;

pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

pub struct UpdateUserPassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

pub struct UpdateUserName {
    pub user_id: UserId,
    pub user_name: String,
}
