use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr)]
pub enum Role {
    Admin,
    #[default]
    User,
}
