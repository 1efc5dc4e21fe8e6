use kernel::model::{
    id::RoomId,
    room::{Equipment, Room},
};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub room_name: String,
    pub room_type: String,
    pub capacity: i32,
    pub speaker: bool,
    pub whiteboard: bool,
    pub monitor: bool,
    pub hdmi_cable: bool,
    pub image: Option<String>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            room_name,
            room_type,
            capacity,
            speaker,
            whiteboard,
            monitor,
            hdmi_cable,
            image,
        } = value;
        Room {
            room_id,
            room_name,
            room_type,
            capacity,
            equipment: Equipment {
                speaker,
                whiteboard,
                monitor,
                hdmi_cable,
            },
            image,
        }
    }
}
