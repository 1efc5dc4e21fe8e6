use super::Equipment;

pub struct CreateRoom {
    pub room_name: String,
    pub room_type: String,
    pub capacity: i32,
    pub equipment: Equipment,
    pub image: Option<String>,
}
